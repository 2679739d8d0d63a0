use confpack_codec::{
    Codec, ConfigContext, ConfigList, ConfigMap, ConfigValue, DecodeError, NbtCodec, Number,
    QuoteStyle, SnbtCodec, TagKind,
};

const PLAYER_DATA: &str = r##"{Brain:{memories:{}},HurtByTimestamp:0,bukkit:{newLevel:0,newExp:0,newTotalExp:0,firstPlayed:1716304392858L,lastKnownName:"Player",keepLevel:0b,expToDrop:0,lastPlayed:1716311099573L},SleepTimer:0s,Attributes:[{Base:1.0d,Name:"minecraft:generic.attack_damage"},{Base:0.0d,Name:"minecraft:generic.armor_toughness"},{Base:0.10000000149011612d,Name:"minecraft:generic.movement_speed"},{Base:4.0d,Name:"minecraft:generic.attack_speed"},{Base:0.0d,Name:"minecraft:generic.armor"},{Base:20.0d,Name:"minecraft:generic.max_health"}],Invulnerable:0b,FallFlying:0b,PortalCooldown:0,AbsorptionAmount:0.0f,abilities:{invulnerable:0b,mayfly:0b,instabuild:0b,walkSpeed:0.1f,mayBuild:1b,flying:0b,flySpeed:0.05f},FallDistance:0.0f,recipeBook:{recipes:["minecraft:iron_nugget_from_blasting","minecraft:gold_nugget_from_blasting","minecraft:painting","minecraft:red_bed","minecraft:gold_nugget_from_smelting","minecraft:red_carpet","minecraft:red_banner","minecraft:iron_nugget_from_smelting"],isBlastingFurnaceFilteringCraftable:0b,isSmokerGuiOpen:0b,isFilteringCraftable:0b,toBeDisplayed:["minecraft:iron_nugget_from_blasting","minecraft:gold_nugget_from_blasting","minecraft:painting","minecraft:red_bed","minecraft:gold_nugget_from_smelting","minecraft:red_carpet","minecraft:red_banner","minecraft:iron_nugget_from_smelting"],isFurnaceGuiOpen:0b,isGuiOpen:0b,isFurnaceFilteringCraftable:0b,isBlastingFurnaceGuiOpen:0b,isSmokerFilteringCraftable:0b},DeathTime:0s,XpSeed:-2140122175,WorldUUIDMost:-9154524897287582949L,Spigot.ticksLived:12256,XpTotal:0,UUID:[I;1729298858,906775680,-1985245204,14760118],playerGameType:0,seenCredits:0b,Motion:[0.0d,-0.0784000015258789d,0.0d],Health:20.0f,Bukkit.updateLevel:2,foodSaturationLevel:0.0f,Air:300s,OnGround:1b,Dimension:"minecraft:the_nether",Rotation:[73.054665f,47.54999f],XpLevel:0,Score:0,Pos:[-1.300000011920929d,98.0d,6.905815973765763d],previousPlayerGameType:1,Fire:-20s,XpP:0.0f,EnderItems:[],DataVersion:2584,foodLevel:15,foodExhaustionLevel:3.5610077f,HurtTime:0s,SelectedItemSlot:2,WorldUUIDLeast:-7240935019876135968L,Inventory:[{Slot:0b,id:"minecraft:command_block",Count:1b,tag:{display:{Name:'{"text":"Hello","color":"#398f3c","italic":false}'}}},{Slot:1b,id:"minecraft:stone_sword",Count:1b,tag:{Damage:0,display:{Name:'{"text":"Test Sword","color":"#af4ebe","italic":false}'},Enchantments:[{lvl:100,id:"minecraft:sharpness"}]}},{Slot:100b,id:"minecraft:diamond_boots",Count:1b,tag:{Damage:0,Enchantments:[{lvl:4,id:"minecraft:feather_falling"}]}},{Slot:101b,id:"minecraft:golden_leggings",Count:1b,tag:{Damage:0,Enchantments:[{lvl:3,id:"minecraft:unbreaking"}]}},{Slot:102b,id:"minecraft:iron_chestplate",Count:1b,tag:{Damage:0,Enchantments:[{lvl:5,id:"minecraft:protection"}]}},{Slot:103b,id:"minecraft:leather_helmet",Count:1b,tag:{Damage:0,Enchantments:[{lvl:3,id:"minecraft:respiration"}]}}],foodTickTimer:0}"##;

const ESCAPED_LORE: &str = r##"{display:{Lore:["{\"text\":\"Test\",\"color\":\"#ffffff\",\"italic\":false}"],Name:"{\"text\":\"Test\",\"color\":\"#55ff55\",\"italic\":false}"}}"##;

#[test]
fn snbt_player_data_roundtrip() {
    let codec = SnbtCodec::new();
    let value = codec.decode_str(&ConfigContext, PLAYER_DATA).unwrap();
    assert_eq!(codec.encode_to_string(&ConfigContext, &value).unwrap(), PLAYER_DATA);

    let map = value.as_map().unwrap();
    assert_eq!(map.get("firstPlayed"), None);
    let bukkit = map.get_map("bukkit").unwrap();
    assert_eq!(
        bukkit.get("firstPlayed").and_then(ConfigValue::as_number),
        Some(&Number::Long(1716304392858))
    );
    assert_eq!(map.get("SleepTimer").and_then(ConfigValue::as_number), Some(&Number::Short(0)));
    assert_eq!(map.get("UUID").unwrap().tag_kind(), Some(TagKind::IntArray));
    assert_eq!(map.get_list("Motion").unwrap().meta.element_tag, Some(TagKind::Double));
    assert_eq!(map.get_list("EnderItems").unwrap().meta.element_tag, Some(TagKind::End));
    assert_eq!(map.get_i64("Spigot.ticksLived"), Some(12256));
}

#[test]
fn snbt_player_data_through_binary() {
    let text = SnbtCodec::new();
    let binary = NbtCodec::new(false);
    let value = text.decode_str(&ConfigContext, PLAYER_DATA).unwrap();
    let bytes = binary.encode_to_vec(&ConfigContext, &value).unwrap();
    let from_binary = binary.decode_slice(&ConfigContext, &bytes).unwrap();
    assert_eq!(from_binary, value);
    assert_eq!(text.encode_to_string(&ConfigContext, &from_binary).unwrap(), PLAYER_DATA);
}

#[test]
fn snbt_escaped_double_quotes() {
    let codec = SnbtCodec::new().use_double_quotes();
    let value = codec.decode_str(&ConfigContext, ESCAPED_LORE).unwrap();
    assert_eq!(codec.encode_to_string(&ConfigContext, &value).unwrap(), ESCAPED_LORE);

    let name = value
        .as_map()
        .and_then(|m| m.get_map("display"))
        .and_then(|d| d.get_str("Name"))
        .unwrap();
    assert!(name.starts_with(r#"{"text":"Test""#));

    let auto = SnbtCodec::new().encode_to_string(&ConfigContext, &value).unwrap();
    assert!(auto.contains(r#"Name:'{"text":"Test","#));
}

#[test]
fn snbt_indexed_list() {
    let value: ConfigValue = ConfigMap::new()
        .with("test", ConfigList::new().with(10i64).with(11i64).with(13i64))
        .into();
    let codec = SnbtCodec::new().expect_indices(true);
    let encoded = codec.encode_to_string(&ConfigContext, &value).unwrap();
    let decoded = codec.decode_str(&ConfigContext, &encoded).unwrap();
    assert_eq!(decoded, value);

    let err = codec
        .decode_str(&ConfigContext, "{test:[1:10,0:11]}")
        .unwrap_err();
    assert_eq!(
        err.root_cause(),
        &DecodeError::IndexOutOfOrder {
            expected: 0,
            found: 1
        }
    );
}

#[test]
fn snbt_quote_selection_matrix() {
    let cases = [
        (QuoteStyle::Auto, "plain", r#""plain""#),
        (QuoteStyle::Auto, r#"a"b"#, r#"'a"b'"#),
        (QuoteStyle::Auto, r#"a"b'c"#, r#"'a"b\'c'"#),
        (QuoteStyle::Double, r#"a"b"#, r#""a\"b""#),
        (QuoteStyle::Single, "it's", r#"'it\'s'"#),
    ];
    for (style, input, expected) in cases {
        let codec = SnbtCodec::new().quotes(style);
        let value = ConfigValue::from(input);
        let text = codec.encode_to_string(&ConfigContext, &value).unwrap();
        assert_eq!(text, expected, "{style:?}");
        assert_eq!(codec.decode_str(&ConfigContext, &text).unwrap(), value);
    }
}

#[test]
fn snbt_byte_array_roundtrip() {
    let codec = SnbtCodec::new();
    let value: ConfigValue = ConfigMap::new()
        .with("data", ConfigValue::blob(vec![0u8, 127, 128, 255]))
        .into();
    let text = codec.encode_to_string(&ConfigContext, &value).unwrap();
    assert_eq!(text, "{data:[B;0,127,-128,-1]}");
    let back = codec.decode_str(&ConfigContext, &text).unwrap();
    let data = back.as_map().unwrap().get("data").unwrap();
    assert_eq!(data.as_blob(), Some(&[0u8, 127, 128, 255][..]));
    assert_eq!(
        confpack_codec::nbt::tag_of(&ConfigContext, data).unwrap(),
        TagKind::ByteArray
    );
}

#[test]
fn snbt_decode_error_matrix() {
    let codec = SnbtCodec::new();
    for (text, expected) in [
        ("{a:1", DecodeError::Unterminated("compound")),
        ("[1,2", DecodeError::Unterminated("list")),
        ("{a:'x}", DecodeError::Unterminated("string")),
        ("{a:12q}", DecodeError::InvalidNumber("12q".to_string())),
        ("{a:'\\x'}", DecodeError::InvalidEscape('x')),
        ("[1,1L]", DecodeError::HeterogeneousList(TagKind::Int, TagKind::Long)),
        ("{}{}", DecodeError::TrailingData),
    ] {
        let err = codec.decode_str(&ConfigContext, text).unwrap_err();
        assert_eq!(err.root_cause(), &expected, "{text}");
    }
}
