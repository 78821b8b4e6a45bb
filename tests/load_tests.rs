// tests/load_tests.rs

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tiled_model::{LoadOptions, Map, MapError};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tiled_model_{tag}_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

const ONE_TILE: &str = r#"
{
    "width": 1,
    "height": 1,
    "tilewidth": 4,
    "tileheight": 4,
    "layers": [ { "id": 1, "name": "L", "type": "tilelayer", "width": 1, "height": 1, "data": [0] } ]
}
"#;

#[test]
fn integration_load_from_file_and_str() -> anyhow::Result<()> {
    let map = Map::load_from_str(ONE_TILE)?;
    assert_eq!(map.width, 1);

    let dir = temp_dir("file_and_str");
    let path = dir.join("map.json");
    fs::write(&path, ONE_TILE)?;
    let map2 = Map::load_from_file(&path)?;
    assert_eq!(map2.tile_width, 4);
    assert_eq!(map, map2);
    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn integration_unsupported_format() {
    let err = Map::load_from_file("foo.tmx").unwrap_err();
    match err {
        MapError::UnsupportedFormat(ext) => assert_eq!(ext, "foo.tmx"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn integration_missing_file_is_io_error() {
    let err = Map::load_from_file("nonexistent_dir/nonexistent.json").unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
}

#[test]
fn load_ignores_extra_fields() {
    let json = r#"
    {
      "width":1, "height":1,
      "tilewidth":8, "tileheight":8,
      "dummyField": "ignored",
      "layers": [
        { "id": 1, "name":"L", "type":"tilelayer", "width":1, "height":1, "data":[0], "parallaxx": 0.5 }
      ]
    }
    "#;
    let map = Map::load_from_str(json).expect("Should ignore unknown fields");
    assert_eq!(map.layers[0].name, "L");
    assert_eq!(map.layers[0].tiles().unwrap().data().as_slice(), &[0]);
}

#[test]
fn missing_external_tileset_only_fails_when_requested() -> anyhow::Result<()> {
    let dir = temp_dir("missing_tileset");
    let path = dir.join("map.json");
    fs::write(
        &path,
        r#"{"tilewidth":16,"tileheight":16,"layers":[],
            "tilesets":[{"firstgid":1,"source":"missing_tileset.json"}]}"#,
    )?;

    let map = Map::load_from_file(&path)?;
    assert_eq!(map.tilesets[0].source, "missing_tileset.json");

    let err = Map::load_with(&path, &LoadOptions::default().load_external_tilesets(true)).unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn malformed_external_tileset_is_json_error() -> anyhow::Result<()> {
    let dir = temp_dir("bad_tileset");
    let path = dir.join("map.json");
    fs::write(
        &path,
        r#"{"tilewidth":16,"tileheight":16,"tilesets":[{"firstgid":1,"source":"ts.json"}]}"#,
    )?;
    fs::write(dir.join("ts.json"), "{ not json")?;

    let err = Map::load_with(&path, &LoadOptions::default().load_external_tilesets(true)).unwrap_err();
    assert!(matches!(err, MapError::Json { .. }));
    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn non_json_external_tileset_is_kept_as_reference() -> anyhow::Result<()> {
    let dir = temp_dir("tsx_tileset");
    let path = dir.join("map.json");
    fs::write(
        &path,
        r#"{"tilewidth":16,"tileheight":16,"tilesets":[{"firstgid":1,"source":"ts.tsx"}]}"#,
    )?;
    let map = Map::load_with(&path, &LoadOptions::default().load_external_tilesets(true))?;
    assert!(map.tilesets[0].tileset.is_none());
    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn tilesets_are_sorted_by_first_gid() {
    let map = Map::load_from_str(
        r#"{"tilewidth":16,"tileheight":16,"tilesets":[
            {"firstgid":50,"source":"b.json"},{"firstgid":1,"source":"a.json"}]}"#,
    )
    .unwrap();
    let firsts: Vec<u32> = map.tilesets.iter().map(|t| t.first_gid).collect();
    assert_eq!(firsts, vec![1, 50]);
}

#[test]
fn duplicate_first_gid_fails_validation() {
    let err = Map::load_from_str(
        r#"{"tilewidth":16,"tileheight":16,"tilesets":[
            {"firstgid":1,"source":"b.json"},{"firstgid":1,"source":"a.json"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, MapError::MalformedEntity { .. }));
}
