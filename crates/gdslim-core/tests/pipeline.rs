//! End-to-end pipeline tests: catalogue → classification → usage detection
//! → closure → profile → round-trip, over a temporary plugin tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use gdslim_core::{
    classify, close, custom_profile, preset_profile, ClassCatalogue, Domain, ExtraDomains, Preset,
    ProfileArtifact, UsageScanner,
};
use tempfile::TempDir;

const API_JSON: &str = r#"{
    "header": {"version_major": 4, "version_minor": 3},
    "classes": [
        {"name": "Object"},
        {"name": "RefCounted", "inherits": "Object"},
        {"name": "Node", "inherits": "Object"},
        {"name": "CanvasItem", "inherits": "Node"},
        {"name": "Node2D", "inherits": "CanvasItem"},
        {"name": "Sprite2D", "inherits": "Node2D"},
        {"name": "MultiMeshInstance2D", "inherits": "Node2D"},
        {"name": "Node3D", "inherits": "Node"},
        {"name": "Camera3D", "inherits": "Node3D"},
        {"name": "Control", "inherits": "CanvasItem"},
        {"name": "Button", "inherits": "Control"},
        {"name": "XRServer", "inherits": "Object"},
        {"name": "HTTPRequest", "inherits": "Node"},
        {"name": "NavigationAgent2D", "inherits": "Node"},
        {"name": "AnimationPlayer", "inherits": "Node"},
        {"name": "OS", "inherits": "Object"},
        {"name": "ClassDB", "inherits": "Object"}
    ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn catalogue() -> ClassCatalogue {
    ClassCatalogue::from_json(API_JSON).unwrap()
}

#[test]
fn custom_pipeline_produces_closed_profile() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/bullets.cpp",
        r#"
#include <godot_cpp/classes/multi_mesh_instance_2d.hpp>
#include <godot_cpp/core/class_db.hpp>

void spawn() {
    Sprite2D *decal = nullptr;
    OS::get_singleton()->get_name();
}
"#,
    );

    let catalogue = catalogue();
    let scanner = UsageScanner::new(catalogue.names().map(String::from)).unwrap();
    let used = scanner.scan(&[temp.path().join("src")]).unwrap();

    assert!(used.contains("MultiMeshInstance2D"));
    assert!(used.contains("Sprite2D"));
    assert!(used.contains("ClassDB"));
    assert!(used.contains("OS"));

    let closed = close(&used, &catalogue);

    // Ancestors pulled in all the way to the root.
    for class in ["Node2D", "CanvasItem", "Node", "Object"] {
        assert!(closed.contains(class), "missing ancestor {class}");
    }
    // Nothing outside the catalogue, and closure is stable.
    assert!(closed.iter().all(|c| catalogue.contains(c)));
    assert_eq!(close(&closed, &catalogue), closed);

    let profile = custom_profile(&closed);
    let path = temp.path().join("build_profile.json");
    profile.write_to(&path).unwrap();

    let reloaded = ProfileArtifact::read_from(&path).unwrap();
    assert!(reloaded.is_enabled_list());
    assert_eq!(reloaded.class_set(), closed);
}

#[test]
fn custom_pipeline_on_empty_tree_falls_back() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/plain.cpp", "int main() { return 0; }\n");

    let catalogue = catalogue();
    let scanner = UsageScanner::new(catalogue.names().map(String::from)).unwrap();
    let used = scanner.scan(&[temp.path().join("src")]).unwrap();
    assert!(used.is_empty());

    let profile = custom_profile(&close(&used, &catalogue));
    assert_eq!(profile.classes(), &["Object", "RefCounted"]);
}

#[test]
fn preset_pipeline_round_trips() {
    let temp = TempDir::new().unwrap();
    let catalogue = catalogue();
    let buckets = classify(&catalogue);

    let profile = preset_profile(Preset::TwoD, ExtraDomains::default(), &buckets);
    assert_eq!(profile.class_set(), buckets[&Domain::ThreeD]);

    let path = temp.path().join("2d_build_profile.json");
    profile.write_to(&path).unwrap();
    let reloaded = ProfileArtifact::read_from(&path).unwrap();

    assert!(!reloaded.is_enabled_list());
    assert_eq!(reloaded.class_set(), profile.class_set());
}

#[test]
fn preset_extras_extend_the_disabled_set() {
    let catalogue = catalogue();
    let buckets = classify(&catalogue);

    let extras = ExtraDomains {
        networking: true,
        ui: true,
        ..Default::default()
    };
    let profile = preset_profile(Preset::TwoD, extras, &buckets);
    let disabled = profile.class_set();

    assert!(disabled.contains("HTTPRequest"));
    assert!(disabled.contains("Button"));
    assert!(disabled.contains("Camera3D"));
    assert!(!disabled.contains("XRServer"));
    assert!(!disabled.contains("Sprite2D"));
}

#[test]
fn detection_survives_stale_references() {
    let temp = TempDir::new().unwrap();
    // RemovedClass is not in the catalogue; the scanner never reports it and
    // the closure cannot resurrect it.
    write(
        temp.path(),
        "src/old.cpp",
        "#include <godot_cpp/classes/node_2d.hpp>\n// RemovedClass was here\n",
    );

    let catalogue = catalogue();
    let scanner = UsageScanner::new(catalogue.names().map(String::from)).unwrap();
    let used = scanner.scan(&[temp.path().join("src")]).unwrap();
    let closed = close(&used, &catalogue);

    assert!(closed.contains("Node2D"));
    assert!(!closed.contains("RemovedClass"));
}

#[test]
fn scan_is_deterministic_across_runs() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/a.cpp", "AnimationPlayer *p;\n");
    write(temp.path(), "src/b.hpp", "#include <godot_cpp/classes/button.hpp>\n");
    write(temp.path(), "include/c.h", "NavigationAgent2D agent;\n");

    let catalogue = catalogue();
    let scanner = UsageScanner::new(catalogue.names().map(String::from)).unwrap();
    let roots = vec![temp.path().join("src"), temp.path().join("include")];

    let first = scanner.scan(&roots).unwrap();
    let second = scanner.scan(&roots).unwrap();
    assert_eq!(first, second);

    let expected: BTreeSet<String> = ["AnimationPlayer", "Button", "NavigationAgent2D"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(first, expected);
}
