//! Checkstyle invocation
//!
//! Assembles `java -jar <jar> -c <config> <target>` once the pipeline has
//! produced a jar.

use std::fmt;
use std::path::Path;

/// An argument vector for running Checkstyle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn checkstyle(java: &str, jar: &Path, config: &str, target: &str) -> Self {
        Self {
            program: java.to_string(),
            args: vec![
                "-jar".to_string(),
                jar.display().to_string(),
                "-c".to_string(),
                config.to_string(),
                target.to_string(),
            ],
        }
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Process builder for this invocation
    pub fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.argv().iter().map(|arg| quote(arg)).collect();
        write!(f, "{}", quoted.join(" "))
    }
}

/// Single-quote an argument for display if it contains shell metacharacters
fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkstyle_argv_order() {
        let invocation = Invocation::checkstyle(
            "java",
            Path::new("/cache/checkstyle-10.12.4-all.jar"),
            "google_checks.xml",
            "src/Main.java",
        );

        assert_eq!(
            invocation.argv(),
            vec![
                "java",
                "-jar",
                "/cache/checkstyle-10.12.4-all.jar",
                "-c",
                "google_checks.xml",
                "src/Main.java",
            ]
        );
    }

    #[test]
    fn display_quotes_spaces() {
        let invocation = Invocation::checkstyle(
            "java",
            Path::new("/Library/Caches/my jars/checkstyle-1.0-all.jar"),
            "sun_checks.xml",
            "it's.java",
        );

        assert_eq!(
            invocation.to_string(),
            "java -jar '/Library/Caches/my jars/checkstyle-1.0-all.jar' -c sun_checks.xml 'it'\\''s.java'"
        );
    }

    #[test]
    fn quote_empty_argument() {
        assert_eq!(quote(""), "''");
    }
}
