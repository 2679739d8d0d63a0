use std::fs;
use std::path::Path;

use confpack::cli::{run, Args, CliError, CompressionArg};
use confpack::{
    default_registry, ConfigContext, ConfigList, ConfigMap, ConfigValue, FileCodec,
    FileCodecRegistry, FileError, FileWrapper, JsonCodec, NbtCodec, SnbtCodec,
};

/// Survives every registered format without losing kinds.
fn server_config() -> ConfigValue {
    ConfigMap::new()
        .with("motd", "A \"quoted\" server")
        .with("port", 25565)
        .with("seed", 5_000_000_000i64)
        .with("view-distance", 10.5)
        .with("ops", ConfigList::new().with("alice").with("bob"))
        .with(
            "world",
            ConfigMap::new()
                .with("name", "overworld")
                .with("spawn", ConfigList::new().with(0).with(64).with(-12)),
        )
        .into()
}

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        indent: 4,
        compression: CompressionArg::Deflate,
        root_name: false,
        force: false,
    }
}

// ── FileCodec ─────────────────────────────────────────────────────────────

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let codec = FileCodec::new(JsonCodec::readable(), "json");
    let loaded = codec
        .load_from_file(&ConfigContext, &dir.path().join("absent.json"))
        .unwrap();
    assert!(loaded.is_none());
}

#[test]
fn save_and_load_every_registered_format() {
    let dir = tempfile::tempdir().unwrap();
    let registry = default_registry();
    let value = server_config();
    for ext in ["json", "mdb", "nbt", "dat", "snbt"] {
        let path = dir.path().join(format!("server.{ext}"));
        let codec = registry.for_path(&path).unwrap();
        codec.save_to_file(&ConfigContext, &value, &path).unwrap();
        let back = codec.load_from_file(&ConfigContext, &path).unwrap().unwrap();
        assert_eq!(back, value, "{ext}");
    }
}

#[test]
fn save_leaves_no_temporary_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let codec = FileCodec::new(JsonCodec::minified(), "json");
    codec.save_to_file(&ConfigContext, &server_config(), &path).unwrap();
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, ["config.json"]);
}

#[test]
fn corrupt_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"key\":\"Invalid Value}").unwrap();
    let codec = FileCodec::new(JsonCodec::readable(), "json");
    match codec.load_from_file(&ConfigContext, &path) {
        Err(FileError::Decode { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn nbt_file_keeps_root_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.nbt");
    let mut value = server_config();
    value.as_map_mut().unwrap().meta.root_name = Some("Data".into());
    let codec = FileCodec::new(NbtCodec::new(true), "nbt");
    codec.save_to_file(&ConfigContext, &value, &path).unwrap();
    let back = codec.load_from_file(&ConfigContext, &path).unwrap().unwrap();
    assert_eq!(back.as_map().unwrap().meta.root_name.as_deref(), Some("Data"));
}

// ── FileCodecRegistry ─────────────────────────────────────────────────────

#[test]
fn find_picks_first_existing_extension() {
    let dir = tempfile::tempdir().unwrap();
    let registry = default_registry();
    assert!(registry.find(&ConfigContext, dir.path(), "server").unwrap().is_none());

    let snbt = dir.path().join("server.snbt");
    fs::write(&snbt, "{port:1}").unwrap();
    let found = registry.find(&ConfigContext, dir.path(), "server").unwrap().unwrap();
    assert_eq!(found.path(), snbt);
    assert_eq!(found.codec().codec().name(), "snbt");

    // .json is registered first, so it wins once present.
    fs::write(dir.path().join("server.json"), "{\"port\": 2}").unwrap();
    let found = registry.find(&ConfigContext, dir.path(), "server").unwrap().unwrap();
    assert_eq!(found.codec().default_extension(), "json");
    assert_eq!(found.root().unwrap().as_map().unwrap().get_i64("port"), Some(2));
}

#[test]
fn find_in_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let registry = default_registry();
    let found = registry
        .find(&ConfigContext, &dir.path().join("nope"), "server")
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn open_rejects_unknown_extension() {
    let registry = default_registry();
    assert!(matches!(
        registry.open(&ConfigContext, Path::new("server.yaml")),
        Err(FileError::UnknownExtension(_))
    ));
}

#[test]
fn empty_registry_has_no_default() {
    let dir = tempfile::tempdir().unwrap();
    let registry = FileCodecRegistry::new();
    assert!(registry.default_codec().is_none());
    let created = registry
        .find_or_create(&ConfigContext, dir.path(), "server", server_config())
        .unwrap();
    assert!(created.is_none());
}

// ── FileWrapper ───────────────────────────────────────────────────────────

#[test]
fn wrapper_creates_then_merges_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let registry = default_registry();
    let defaults: ConfigValue = ConfigMap::new().with("port", 25565).with("motd", "hello").into();

    let wrapper = registry
        .find_or_create(&ConfigContext, dir.path(), "server", defaults.clone())
        .unwrap()
        .unwrap();
    assert_eq!(wrapper.path(), dir.path().join("server.json"));
    assert_eq!(wrapper.root(), Some(&defaults));
    wrapper.save().unwrap();

    // An edited file keeps its values; new defaults fill the gaps.
    fs::write(dir.path().join("server.json"), "{\"port\": 1234}").unwrap();
    let defaults: ConfigValue = ConfigMap::new()
        .with("port", 25565)
        .with("motd", "hello")
        .with("max-players", 20)
        .into();
    let wrapper = registry
        .find_or_create(&ConfigContext, dir.path(), "server", defaults)
        .unwrap()
        .unwrap();
    let root = wrapper.root().unwrap().as_map().unwrap();
    assert_eq!(root.get_i64("port"), Some(1234));
    assert_eq!(root.get_str("motd"), Some("hello"));
    assert_eq!(root.get_i64("max-players"), Some(20));
}

#[test]
fn wrapper_save_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player.snbt");
    let codec = FileCodec::new(SnbtCodec::new(), "snbt");
    let mut wrapper = FileWrapper::new(&ConfigContext, codec.clone(), path.clone());
    wrapper.save().unwrap();
    assert!(!path.exists());

    wrapper.set_root(Some(server_config()));
    wrapper.save().unwrap();

    let mut reloaded = FileWrapper::new(&ConfigContext, codec, path);
    reloaded.load().unwrap();
    assert_eq!(reloaded.root(), Some(&server_config()));
    if let Some(ConfigValue::Map(map)) = reloaded.root_mut() {
        map.insert("port", 1);
    }
    reloaded.save().unwrap();
    reloaded.load().unwrap();
    assert_eq!(reloaded.root().unwrap().as_map().unwrap().get_i64("port"), Some(1));
}

// ── cfgtool ───────────────────────────────────────────────────────────────

#[test]
fn cli_converts_between_formats() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("server.json");
    let mdb = dir.path().join("server.mdb");
    let snbt = dir.path().join("server.snbt");
    let back = dir.path().join("back.json");
    FileCodec::new(JsonCodec::readable(), "json")
        .save_to_file(&ConfigContext, &server_config(), &json)
        .unwrap();

    let conversion = run(&args(&json, &mdb)).unwrap();
    assert_eq!(conversion.input_format, "json");
    assert_eq!(conversion.output_format, "binary");
    assert_eq!(conversion.bytes_written, fs::metadata(&mdb).unwrap().len());
    assert_eq!(&fs::read(&mdb).unwrap()[..4], b"MDCB");

    run(&args(&mdb, &snbt)).unwrap();
    assert!(fs::read_to_string(&snbt).unwrap().starts_with("{motd:'A \"quoted\" server'"));

    run(&args(&snbt, &back)).unwrap();
    let registry = default_registry();
    let codec = registry.for_path(&back).unwrap();
    assert_eq!(
        codec.load_from_file(&ConfigContext, &back).unwrap(),
        Some(server_config())
    );
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.snbt");
    fs::write(&input, "{\"a\": 1}").unwrap();
    fs::write(&output, "{a:0}").unwrap();

    let mut convert = args(&input, &output);
    assert!(matches!(run(&convert), Err(CliError::OutputExists(_))));
    assert_eq!(fs::read_to_string(&output).unwrap(), "{a:0}");

    convert.force = true;
    run(&convert).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "{a:1}");
}

#[test]
fn cli_root_name_and_compression() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("level.snbt");
    let output = dir.path().join("level.mdb");
    let nbt = dir.path().join("level.nbt");
    fs::write(&input, "Data:{version:3}").unwrap();

    let mut convert = args(&input, &output);
    convert.root_name = true;
    convert.compression = CompressionArg::None;
    run(&convert).unwrap();
    assert_eq!(fs::read(&output).unwrap()[4], 0);

    run(&args(&input, &nbt)).unwrap_err();
    let mut convert = args(&input, &nbt);
    convert.root_name = true;
    run(&convert).unwrap();
    let level = NbtCodec::new(true)
        .decode_bytes(&ConfigContext, &fs::read(&nbt).unwrap())
        .unwrap();
    assert_eq!(level.as_map().unwrap().meta.root_name.as_deref(), Some("Data"));
}

#[test]
fn cli_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let convert = args(&dir.path().join("nope.json"), &dir.path().join("out.mdb"));
    assert!(matches!(run(&convert), Err(CliError::MissingInput(_))));
}
