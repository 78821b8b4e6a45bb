// tests/integration_example.rs

use std::path::PathBuf;
use tiled_model::{FlipFlags, LayerType, LoadOptions, Map, ObjectShape, PropertyType, SourceRect, VAlign};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load_fixture_map() -> Map {
    Map::load_with(fixture("map.json"), &LoadOptions::default().load_external_tilesets(true))
        .expect("fixture map should load")
}

#[test]
fn example_load_fixture() {
    let map = load_fixture_map();
    assert_eq!((map.width, map.height), (4, 3));
    assert_eq!(map.background_color.as_deref(), Some("#202030"));
    assert_eq!(map.properties.get("music").map(|p| p.kind), Some(PropertyType::File));
    assert_eq!(map.properties.get_i32("level"), Some(2));
    assert_eq!(map.tilesets.len(), 2);
    assert!(map.tilesets.iter().all(|t| t.tileset.is_some()));
}

#[test]
fn fixture_layers_in_depth_first_order() {
    let map = load_fixture_map();
    let layers: Vec<(u32, LayerType)> = map.layers().map(|l| (l.id, l.layer_type())).collect();
    assert_eq!(
        layers,
        vec![
            (1, LayerType::TileLayer),
            (6, LayerType::ImageLayer),
            (3, LayerType::ObjectGroup),
            (5, LayerType::ObjectGroup),
        ]
    );
    let objects: Vec<u32> = map.objects().map(|o| o.id).collect();
    assert_eq!(objects, vec![1, 2, 3, 4]);
}

#[test]
fn fixture_cells_decode_and_cut() {
    let map = load_fixture_map();
    let tiles = map.layer_by_id(1).and_then(|l| l.tiles()).unwrap();

    let flipped = tiles.cell(1, 1).unwrap();
    assert_eq!(flipped.gid, 6);
    assert_eq!(flipped.flags, FlipFlags::HORIZONTAL | FlipFlags::DIAGONAL);
    assert_eq!(
        map.source_rect(flipped.gid).unwrap(),
        SourceRect { x: 16, y: 16, width: 16, height: 16 }
    );

    let last = tiles.cell(3, 2).unwrap();
    assert_eq!((last.gid, last.flags), (12, FlipFlags::VERTICAL));
    assert_eq!(map.tileset_for_gid(last.gid).unwrap().first_gid, 1);
    assert_eq!(map.source_rect(12).unwrap(), SourceRect { x: 48, y: 32, width: 16, height: 16 });

    assert_eq!(map.tileset_for_gid(13).unwrap().first_gid, 13);
    assert_eq!(map.source_rect(14).unwrap(), SourceRect { x: 18, y: 1, width: 16, height: 16 });
}

#[test]
fn fixture_tile_metadata() {
    let map = load_fixture_map();
    let edge = map.tile_for_gid(2).unwrap().unwrap();
    assert_eq!(edge.kind.as_deref(), Some("grass_edge"));
    assert_eq!(edge.terrain, [0, 0, 1, 1]);
    assert_eq!(edge.properties.get_bool("walkable"), Some(true));

    let chest = map.object_by_id(2).unwrap();
    let animated = map.tile_for_gid(chest.tile_id().unwrap().raw()).unwrap().unwrap();
    assert_eq!(animated.animation_duration_ms(), 400);

    let terrain = map.tilesets[0].tileset.as_ref().unwrap();
    assert_eq!(terrain.terrains[1].name, "dirt");
}

#[test]
fn fixture_objects_and_image_layer() {
    let map = load_fixture_map();

    let player = map.object_by_id(1).unwrap();
    assert_eq!(player.shape, ObjectShape::Point);
    assert_eq!(player.class_name.as_deref(), Some("spawn"));

    let path = map.object_by_id(3).unwrap();
    assert_eq!(path.points().map(|p| p.len()), Some(2));

    let sign = map.object_by_id(4).and_then(|o| o.text()).unwrap();
    assert_eq!(sign.text, "Welcome");
    assert!(sign.wrap && sign.bold && sign.kerning);
    assert_eq!(sign.v_align, VAlign::Center);
    assert_eq!(sign.color, "#000000");

    let sky = map.layer_by_id(6).unwrap();
    assert_eq!(sky.image().map(|i| (i.width, i.height)), Some((640, 480)));
    assert_eq!(sky.tint_color.as_deref(), Some("#ff8080"));
    assert_eq!((sky.offset_x, sky.offset_y), (4.5, -2.0));

    let labels = map.group_by_id(4).unwrap();
    assert_eq!(labels.layers[0].name, "signs");
    assert_eq!(map.layer_by_id(3).and_then(|l| l.color.as_deref()), Some("#a0a0a4"));
}

#[test]
fn external_tileset_left_unread_by_default() {
    let map = Map::load_from_file(fixture("map.json")).unwrap();
    assert_eq!(map.tilesets[0].source, "terrain.json");
    assert!(map.tilesets[0].tileset.is_none());
    assert!(map.tile_for_gid(2).unwrap().is_none());
    assert!(map.source_rect(2).is_err());
    // embedded tileset still cuts
    assert_eq!(map.source_rect(13).unwrap().x, 1);
}
