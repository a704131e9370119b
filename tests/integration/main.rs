//! Integration tests for vramslot

use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DESCRIPTOR_3B: &str = r#"
[model]
norm = "fusedrms"
vid_out_norm = "fusedrms"
txt_in_norm = "fusedln"
qk_norm = "fusedrms"
heads = 24

[vae.memory_limit]
conv_max_mem = 0.5
norm_max_mem = 0.5
"#;

const DESCRIPTOR_7B: &str = r#"
[model]
norm = "fusedln"
vid_out_norm = "fusedln"
heads = 32
"#;

/// Lay out a config, descriptors and cache in a temp dir
fn fixture(with_weights: bool) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    std::fs::create_dir_all(root.join("configs")).unwrap();
    std::fs::write(root.join("configs/3b.toml"), DESCRIPTOR_3B).unwrap();
    std::fs::write(root.join("configs/7b.toml"), DESCRIPTOR_7B).unwrap();

    let weights = root.join("cache/weights");
    std::fs::create_dir_all(&weights).unwrap();
    if with_weights {
        std::fs::write(weights.join("3b.pth"), b"").unwrap();
        std::fs::write(weights.join("7b.pth"), b"").unwrap();
    }

    let config = format!(
        r#"
[cache]
base_dir = "{}"
weights_subdir = "weights"

[manager]
default_variant = "3b"

[variants.3b]
checkpoint = "3b.pth"
descriptor = "configs/3b.toml"

[variants.7b]
checkpoint = "7b.pth"
descriptor = "configs/7b.toml"
"#,
        root.join("cache").display()
    );
    let config_path = root.join("config.toml");
    std::fs::write(&config_path, config).unwrap();

    (temp, config_path)
}

mod cli_tests {
    use super::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn vramslot(config: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("vramslot");
        cmd.arg("--config").arg(config);
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("vramslot")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("single-slot accelerator runner cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("vramslot")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("vramslot"));
    }

    #[test]
    fn variants_json_reports_availability() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["variants", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"3b\""))
            .stdout(predicate::str::contains("\"available\": false"));
    }

    #[test]
    fn variants_plain_lists_ids() {
        let (_temp, config) = fixture(true);
        vramslot(&config)
            .args(["variants", "--format", "plain"])
            .assert()
            .success()
            .stdout("3b\n7b\n");
    }

    #[test]
    fn describe_prints_normalized_config() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["describe", "3b"])
            .assert()
            .success()
            .stdout(predicate::str::contains("norm = \"rms\""))
            .stdout(predicate::str::contains("txt_in_norm = \"layer\""))
            .stdout(predicate::str::contains("fused").not());
    }

    #[test]
    fn describe_does_not_add_undeclared_options() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["describe", "7b"])
            .assert()
            .success()
            .stdout(predicate::str::contains("qk_norm").not())
            .stdout(predicate::str::contains("txt_in_norm").not());
    }

    #[test]
    fn describe_unknown_variant() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["describe", "13b"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown model variant '13b'"))
            .stderr(predicate::str::contains("3b, 7b"));
    }

    #[test]
    fn check_fails_on_missing_weights() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("missing"))
            .stderr(predicate::str::contains("2 of 2 variant(s) failed checks"));
    }

    #[test]
    fn check_passes_when_provisioned() {
        let (_temp, config) = fixture(true);
        vramslot(&config)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("All variants ready"));
    }

    #[test]
    fn relative_cache_dir_follows_config_file() {
        let (temp, config) = fixture(true);
        let contents = std::fs::read_to_string(&config).unwrap().replace(
            &format!("base_dir = \"{}\"", temp.path().join("cache").display()),
            "base_dir = \"cache\"",
        );
        std::fs::write(&config, contents).unwrap();
        let elsewhere = TempDir::new().unwrap();

        vramslot(&config)
            .current_dir(elsewhere.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("All variants ready"));
    }

    #[test]
    fn config_path() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let (_temp, config) = fixture(false);
        vramslot(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[manager]"))
            .stdout(predicate::str::contains("default_variant = \"3b\""));
    }

    #[test]
    fn config_init_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("fresh").join("config.toml");
        vramslot(&config)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(config.exists());
    }

    #[test]
    fn mux_missing_video_fails() {
        let temp = TempDir::new().unwrap();
        vramslot(&temp.path().join("config.toml"))
            .arg("mux")
            .arg(temp.path().join("src.mp4"))
            .arg(temp.path().join("absent.mp4"))
            .arg(temp.path().join("out.mp4"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("IO error"));
    }
}

mod manager_tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use vramslot::config::ConfigManager;
    use vramslot::provision::ArtifactStore;
    use vramslot::runner::{
        Device, Location, Runner, RunnerConfig, RunnerFactory, TomlDescriptorLoader,
    };
    use vramslot::{ManagerParts, Residency, RunnerManager, VariantRegistry, VariantSpec};
    use vramslot::{VramslotError, VramslotResult};

    struct HostRunner {
        location: Mutex<Location>,
    }

    #[async_trait]
    impl Runner for HostRunner {
        async fn move_to(&self, location: Location) -> VramslotResult<()> {
            *self.location.lock().unwrap() = location;
            Ok(())
        }

        fn location(&self) -> Location {
            *self.location.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        builds: AtomicUsize,
    }

    #[async_trait]
    impl RunnerFactory for CountingFactory {
        async fn build(
            &self,
            _spec: &VariantSpec,
            _config: &RunnerConfig,
            checkpoint: &Path,
        ) -> VramslotResult<Arc<dyn Runner>> {
            assert!(checkpoint.exists());
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(HostRunner {
                location: Mutex::new(Location::Host),
            }))
        }
    }

    struct NullDevice;

    #[async_trait]
    impl Device for NullDevice {
        fn name(&self) -> &str {
            "null"
        }

        async fn release_cached(&self) -> VramslotResult<()> {
            Ok(())
        }
    }

    async fn manager_for(config_path: &Path, factory: Arc<CountingFactory>) -> RunnerManager {
        let config_manager = ConfigManager::with_path(config_path.to_path_buf());
        let config = config_manager.load().await.unwrap();
        let store = ArtifactStore::init(config.cache.base_dir.clone(), &config.cache.weights_subdir)
            .await
            .unwrap();

        RunnerManager::new(ManagerParts {
            registry: VariantRegistry::from_config(&config, &config_manager.config_dir()),
            resolver: Arc::new(store),
            loader: Arc::new(TomlDescriptorLoader),
            factory,
            device: Arc::new(NullDevice),
        })
    }

    #[tokio::test]
    async fn switches_between_configured_variants() {
        let (_temp, config) = fixture(true);
        let factory = Arc::new(CountingFactory::default());
        let manager = manager_for(&config, Arc::clone(&factory)).await;

        let first = manager.use_variant("3b").await.unwrap();
        assert_eq!(first.config.model.qk_norm.as_deref(), Some("rms"));

        let second = manager.use_variant("7b").await.unwrap();
        assert_eq!(second.config.model.norm, "rms");
        assert_eq!(first.runner.location(), Location::Host);

        manager.use_variant("3b").await.unwrap();
        assert_eq!(factory.builds.load(Ordering::SeqCst), 2);

        let residency: Vec<_> = manager
            .status()
            .await
            .into_iter()
            .map(|s| (s.id, s.residency))
            .collect();
        assert_eq!(
            residency,
            vec![
                ("3b".to_string(), Residency::Fast),
                ("7b".to_string(), Residency::Spill),
            ]
        );
    }

    #[tokio::test]
    async fn provisioning_after_missing_artifact_recovers() {
        let (temp, config) = fixture(false);
        let factory = Arc::new(CountingFactory::default());
        let manager = manager_for(&config, Arc::clone(&factory)).await;

        let err = manager.use_variant("7b").await.unwrap_err();
        assert!(matches!(err, VramslotError::MissingArtifact(_)));
        assert_eq!(manager.status().await[1].residency, Residency::Unbuilt);

        std::fs::write(temp.path().join("cache/weights/7b.pth"), b"").unwrap();
        manager.use_variant("7b").await.unwrap();
        assert_eq!(manager.active().await.as_deref(), Some("7b"));
        assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
    }
}
