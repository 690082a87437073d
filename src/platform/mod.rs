pub mod overlay;

#[cfg(not(target_os = "macos"))]
pub mod default;
#[cfg(target_os = "macos")]
pub mod macos;
