//! Integration tests for csjar

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    // Nothing listens on the discard port, so every request fails fast
    const OFFLINE_CONFIG: &str = r#"
[remote]
metadata_url = "http://127.0.0.1:9/maven-metadata.xml"
release_base_url = "http://127.0.0.1:9/releases"
"#;

    /// Isolated config file and cache directory
    struct Sandbox {
        temp: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("config.toml"), OFFLINE_CONFIG).unwrap();
            Self { temp }
        }

        fn cache_dir(&self) -> PathBuf {
            self.temp.path().join("jars")
        }

        fn cache_jar(&self, version: &str) -> PathBuf {
            fs::create_dir_all(self.cache_dir()).unwrap();
            let path = self
                .cache_dir()
                .join(format!("checkstyle-{}-all.jar", version));
            fs::write(&path, b"jar").unwrap();
            path
        }

        fn cached_names(&self) -> Vec<String> {
            let mut names: Vec<String> = fs::read_dir(self.cache_dir())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        fn csjar(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("csjar");
            cmd.env("CSJAR_CONFIG", self.temp.path().join("config.toml"))
                .env("CSJAR_CACHE_DIR", self.cache_dir())
                .env_remove("CSJAR_VERSION");
            cmd
        }
    }

    fn display(path: &Path) -> String {
        path.display().to_string()
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("csjar")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Checkstyle jar provider"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("csjar")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("csjar"));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[checkstyle]"))
            .stdout(predicate::str::contains("127.0.0.1:9"));
    }

    #[test]
    fn config_init_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        cargo_bin_cmd!("csjar")
            .env("CSJAR_CONFIG", &path)
            .args(["config", "init"])
            .assert()
            .success();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("version = \"latest\""));
    }

    #[test]
    fn resolve_exact_version_offline() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["resolve", "--use-version", "10.12.4"])
            .assert()
            .success()
            .stdout(predicate::str::diff("10.12.4\n"));
    }

    #[test]
    fn resolve_latest_offline_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .arg("resolve")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("could not be fetched"));
    }

    #[test]
    fn invalid_version_rejected() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["fetch", "--use-version", "../evil"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid Checkstyle version"));
    }

    #[test]
    fn fetch_offline_empty_cache_exhausts_fallback() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .arg("fetch")
            .assert()
            .failure()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("cannot be determined or downloaded"));
    }

    #[test]
    fn fetch_offline_uses_cached_jar() {
        let sandbox = Sandbox::new();
        let jar = sandbox.cache_jar("9.3");

        sandbox
            .csjar()
            .arg("fetch")
            .assert()
            .success()
            .stdout(predicate::str::contains(display(&jar)))
            .stderr(predicate::str::contains("Using existing jar"));
    }

    #[test]
    fn fetch_exact_version_already_cached() {
        let sandbox = Sandbox::new();
        let jar = sandbox.cache_jar("10.12.4");

        sandbox
            .csjar()
            .args(["fetch", "--use-version", "10.12.4"])
            .assert()
            .success()
            .stdout(predicate::str::contains(display(&jar)));
    }

    #[test]
    fn fetch_exact_version_download_fails_over_to_cache() {
        let sandbox = Sandbox::new();
        let old = sandbox.cache_jar("9.3");

        sandbox
            .csjar()
            .args(["fetch", "--use-version", "10.12.4"])
            .assert()
            .success()
            .stdout(predicate::str::contains(display(&old)));

        // The failed download leaves nothing behind
        assert_eq!(sandbox.cached_names(), vec!["checkstyle-9.3-all.jar"]);
    }

    #[test]
    fn command_prints_invocation() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");

        sandbox
            .csjar()
            .args(["command", "Main.java", "--use-version", "10.12.4"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("java -jar "))
            .stdout(predicate::str::contains(
                "checkstyle-10.12.4-all.jar -c google_checks.xml Main.java",
            ));
    }

    #[test]
    fn command_json_argv() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");

        let output = sandbox
            .csjar()
            .args([
                "command",
                "Main.java",
                "--json",
                "--checks",
                "sun_checks.xml",
                "--use-version",
                "10.12.4",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());

        let argv: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(argv[0], "java");
        assert_eq!(argv[1], "-jar");
        assert!(argv[2].ends_with("checkstyle-10.12.4-all.jar"));
        assert_eq!(&argv[3..], ["-c", "sun_checks.xml", "Main.java"]);
    }

    #[test]
    fn run_reports_missing_java() {
        let sandbox = Sandbox::new();
        fs::write(
            sandbox.temp.path().join("config.toml"),
            format!("{}\n[runtime]\njava = \"csjar-no-such-java\"\n", OFFLINE_CONFIG),
        )
        .unwrap();
        sandbox.cache_jar("10.12.4");

        sandbox
            .csjar()
            .args(["run", "Main.java", "--use-version", "10.12.4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command failed"))
            .stderr(predicate::str::contains("java is installed"));
    }

    #[test]
    fn run_rejects_json_flag() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["run", "Main.java", "--json"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("--json"));
    }

    #[test]
    fn cache_path() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(display(&sandbox.cache_dir())));
    }

    #[test]
    fn cache_list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .csjar()
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached jars"));
    }

    #[test]
    fn cache_list_shows_versions() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");
        sandbox.cache_jar("9.3");

        sandbox
            .csjar()
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("10.12.4"))
            .stdout(predicate::str::contains("9.3"))
            .stdout(predicate::str::contains("Total: 2 cached entries"));
    }

    #[test]
    fn cache_clean_keeps_configured_version() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");
        sandbox.cache_jar("9.3");
        fs::write(sandbox.cache_dir().join("stray.tmp"), b"x").unwrap();

        sandbox
            .csjar()
            .args(["cache", "clean", "--use-version", "10.12.4"])
            .assert()
            .success();

        assert_eq!(sandbox.cached_names(), vec!["checkstyle-10.12.4-all.jar"]);
    }

    #[test]
    fn cache_clean_without_current_jar_removes_nothing() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("9.3");

        sandbox
            .csjar()
            .args(["cache", "clean", "--use-version", "10.12.4"])
            .assert()
            .success()
            .stderr(predicate::str::contains("nothing removed"));

        assert_eq!(sandbox.cached_names(), vec!["checkstyle-9.3-all.jar"]);
    }

    #[test]
    fn cache_clear_with_yes() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");
        sandbox.cache_jar("9.3");

        sandbox
            .csjar()
            .args(["cache", "clear", "--yes"])
            .assert()
            .success();

        assert!(sandbox.cached_names().is_empty());
    }

    #[test]
    fn cache_clear_aborts_without_confirmation() {
        let sandbox = Sandbox::new();
        sandbox.cache_jar("10.12.4");

        sandbox
            .csjar()
            .args(["cache", "clear"])
            .write_stdin("n\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Aborted"));

        assert_eq!(sandbox.cached_names(), vec!["checkstyle-10.12.4-all.jar"]);
    }
}
