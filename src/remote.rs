//! Remote endpoints and the artifact naming convention

use crate::version::Version;

/// Maven metadata document listing every published Checkstyle release
pub const DEFAULT_METADATA_URL: &str =
    "https://repo1.maven.org/maven2/com/puppycrawl/tools/checkstyle/maven-metadata.xml";

/// GitHub release download root for Checkstyle
pub const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/checkstyle/checkstyle/releases/download";

/// Artifact family name, shared by the file name and the release tag
pub const ARTIFACT_FAMILY: &str = "checkstyle";

const JAR_SUFFIX: &str = "-all.jar";

/// File name of the all-in-one jar for `version`
pub fn jar_file_name(version: &Version) -> String {
    format!("{}-{}{}", ARTIFACT_FAMILY, version, JAR_SUFFIX)
}

/// Recover the version from a cached jar's file name
pub fn version_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix(ARTIFACT_FAMILY)?
        .strip_prefix('-')?
        .strip_suffix(JAR_SUFFIX)
        .filter(|v| !v.is_empty())
}

/// Download URL of the jar for `version`:
/// `<base>/checkstyle-<version>/checkstyle-<version>-all.jar`
pub fn artifact_url(release_base_url: &str, version: &Version) -> String {
    format!(
        "{}/{}-{}/{}",
        release_base_url.trim_end_matches('/'),
        ARTIFACT_FAMILY,
        version,
        jar_file_name(version)
    )
}
