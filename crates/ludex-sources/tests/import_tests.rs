//! Integration tests for a full multi-source import pass

use ludex_library::{LibraryStore, Platform, Reconciler, run_import};
use ludex_sources::{EpicSource, FolderSource, SteamSource};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds a fake Steam/Epic/folder filesystem under one temp directory
struct TestEnvironment {
    #[allow(dead_code)]
    temp_dir: TempDir,
    steam_root: PathBuf,
    epic_manifests: PathBuf,
    epic_registry: PathBuf,
    folders_root: PathBuf,
    snapshot: PathBuf,
}

impl TestEnvironment {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let steam_root = temp_dir.path().join("Steam");
        let epic_manifests = temp_dir.path().join("Epic").join("Manifests");
        let epic_registry = temp_dir.path().join("Epic").join("LauncherInstalled.dat");
        let folders_root = temp_dir.path().join("Games");
        let snapshot = temp_dir.path().join("library.json");

        fs::create_dir_all(steam_root.join("steamapps").join("common")).unwrap();
        fs::create_dir_all(&epic_manifests).unwrap();
        fs::create_dir_all(&folders_root).unwrap();

        Self {
            temp_dir,
            steam_root,
            epic_manifests,
            epic_registry,
            folders_root,
            snapshot,
        }
    }

    fn add_steam_game(&self, appid: i64, name: &str, installdir: &str, exe_size: usize) {
        let manifest = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{appid}\"\n\t\"name\"\t\t\"{name}\"\n\t\"installdir\"\t\t\"{installdir}\"\n}}\n"
        );
        fs::write(
            self.steam_root
                .join("steamapps")
                .join(format!("appmanifest_{appid}.acf")),
            manifest,
        )
        .unwrap();

        let install = self.steam_root.join("steamapps").join("common").join(installdir);
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join("game.exe"), vec![0u8; exe_size]).unwrap();
    }

    fn add_epic_game(&self, app_name: &str, display_name: &str) -> PathBuf {
        let install = self.temp_dir.path().join("EpicGames").join(display_name);
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join("game.exe"), vec![0u8; 2048]).unwrap();

        let item = format!(
            r#"{{"DisplayName": "{display_name}", "AppName": "{app_name}", "InstallLocation": {}}}"#,
            serde_json::to_string(&install.to_string_lossy()).unwrap()
        );
        fs::write(self.epic_manifests.join(format!("{app_name}.item")), item).unwrap();
        install
    }

    fn add_folder_game(&self, name: &str, with_exe: bool) {
        let dir = self.folders_root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if with_exe {
            fs::write(dir.join("launch.exe"), vec![0u8; 4096]).unwrap();
        }
    }

    fn store(&self) -> LibraryStore {
        LibraryStore::new(&self.snapshot)
    }
}

#[test]
fn test_full_import_across_sources() {
    let env = TestEnvironment::new();
    env.add_steam_game(620, "Portal 2", "Portal 2", 200 * 1024);
    env.add_epic_game("Min", "Hades");
    env.add_folder_game("Cuphead", true);

    let steam = SteamSource::new(&env.steam_root, 3);
    let epic = EpicSource::new(&env.epic_manifests, &env.epic_registry, 3);
    let folders = FolderSource::unmanaged(&env.folders_root, 3);

    let store = env.store();
    let report = run_import(&store, &[&steam, &epic, &folders]);

    assert_eq!(report.games_count, 3);
    assert_eq!(report.completed_count, 0);
    assert!(report.sources.iter().all(|s| s.errors.is_empty()));

    let library = store.load();
    let portal = library.find(620).expect("Portal 2 imported");
    assert_eq!(portal.platform, Platform::Steam);
    assert_eq!(portal.steam_app_id, Some(620));
    assert!(portal.executable.as_deref().unwrap().ends_with("game.exe"));
}

#[test]
fn test_reimport_is_idempotent() {
    let env = TestEnvironment::new();
    env.add_steam_game(620, "Portal 2", "Portal 2", 200 * 1024);
    env.add_steam_game(570, "Dota 2", "dota 2 beta", 100 * 1024);

    let steam = SteamSource::new(&env.steam_root, 3);
    let store = env.store();

    let first = run_import(&store, &[&steam]);
    let before = store.load();
    let second = run_import(&store, &[&steam]);
    let after = store.load();

    assert_eq!(first.games_count, 2);
    assert_eq!(second.games_count, 2);
    assert_eq!(before, after);
}

#[test]
fn test_blocklisted_and_tool_entries_found_but_not_imported() {
    let env = TestEnvironment::new();
    env.add_steam_game(620, "Portal 2", "Portal 2", 64 * 1024);
    env.add_steam_game(228980, "Steamworks Common Redistributables", "Steamworks Shared", 1024);
    env.add_steam_game(431960, "Wallpaper Engine", "wallpaper_engine", 1024);

    let steam = SteamSource::new(&env.steam_root, 3);
    let store = env.store();
    let report = run_import(&store, &[&steam]);

    assert_eq!(report.sources[0].found, 3);
    assert_eq!(report.sources[0].imported, 1);

    let library = store.load();
    assert!(library.find(620).is_some());
    assert!(library.find(228980).is_none());
    assert!(library.find(431960).is_none());
}

#[test]
fn test_manual_executable_survives_reimport() {
    let env = TestEnvironment::new();
    // Steam knows the title but its install directory holds no executable.
    env.add_steam_game(400, "Portal", "Portal", 0);
    fs::remove_file(
        env.steam_root
            .join("steamapps")
            .join("common")
            .join("Portal")
            .join("game.exe"),
    )
    .unwrap();

    let steam = SteamSource::new(&env.steam_root, 3);
    let store = env.store();
    run_import(&store, &[&steam]);

    let mut reconciler = Reconciler::new(store.load());
    reconciler
        .set_executable(400, Some("D:\\custom\\portal.exe".to_string()))
        .unwrap();
    store.save(reconciler.library()).unwrap();

    run_import(&store, &[&steam]);

    let library = store.load();
    assert_eq!(
        library.find(400).unwrap().executable.as_deref(),
        Some("D:\\custom\\portal.exe")
    );
}

#[test]
fn test_missing_source_root_is_isolated() {
    let env = TestEnvironment::new();
    env.add_steam_game(620, "Portal 2", "Portal 2", 64 * 1024);
    env.add_folder_game("Cuphead", true);

    let steam = SteamSource::new(&env.steam_root, 3);
    let epic = EpicSource::new(
        env.temp_dir.path().join("NoSuchManifests"),
        &env.epic_registry,
        3,
    );
    let folders = FolderSource::unmanaged(&env.folders_root, 3);

    let store = env.store();
    let report = run_import(&store, &[&steam, &epic, &folders]);

    assert_eq!(report.sources[0].imported, 1);
    assert!(!report.sources[1].errors.is_empty());
    assert_eq!(report.sources[1].imported, 0);
    assert_eq!(report.sources[2].imported, 1);
    assert_eq!(report.games_count, 2);
}

#[test]
fn test_epic_registry_fallback_for_install_location() {
    let env = TestEnvironment::new();
    let install = env.temp_dir.path().join("EpicGames").join("Celeste");
    fs::create_dir_all(&install).unwrap();
    fs::write(install.join("celeste.exe"), vec![0u8; 2048]).unwrap();

    // Item without InstallLocation; the registry supplies it.
    fs::write(
        env.epic_manifests.join("Sugar.item"),
        r#"{"DisplayName": "Celeste", "AppName": "Sugar"}"#,
    )
    .unwrap();
    let registry = format!(
        r#"{{"InstallationList": [{{"AppName": "Sugar", "InstallLocation": {}}}]}}"#,
        serde_json::to_string(&install.to_string_lossy()).unwrap()
    );
    fs::write(&env.epic_registry, registry).unwrap();

    let epic = EpicSource::new(&env.epic_manifests, &env.epic_registry, 3);
    let store = env.store();
    run_import(&store, &[&epic]);

    let library = store.load();
    let celeste = library
        .iter_all()
        .find(|g| g.name == "Celeste")
        .expect("Celeste imported");
    assert_eq!(celeste.platform, Platform::Epic);
    assert!(celeste.executable.as_deref().unwrap().ends_with("celeste.exe"));
}
