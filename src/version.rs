//! Build-time version metadata

/// Image repository of this app, overridable at compile time via
/// `JX_APP_JACOCO_IMAGE`
pub const IMAGE_REPOSITORY: &str = match option_env!("JX_APP_JACOCO_IMAGE") {
    Some(image) => image,
    None => "gcr.io/jenkinsxio/jx-app-jacoco",
};

/// Released version, overridable at compile time via `JX_APP_JACOCO_VERSION`
pub const VERSION: &str = match option_env!("JX_APP_JACOCO_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Fully qualified image reference of this build
pub fn image() -> String {
    format!("{}:{}", IMAGE_REPOSITORY, VERSION)
}
