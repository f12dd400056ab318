use block_halo::prelude::*;

#[test]
fn lab_config_parses_from_json() {
    let cfg: LabConfig =
        serde_json::from_str(r#"{ "shape": { "nx": 16, "ny": 8 }, "order": "Order4" }"#).unwrap();
    assert_eq!(cfg.shape, BlockShape::new(16, 8));
    assert_eq!(cfg.order, StencilOrder::Order4);
    assert_eq!(cfg.policy, StreamPolicy::Assign);
    assert_eq!(cfg.footprint(), StencilFootprint::symmetric(2));
    cfg.validate().unwrap();
}

#[test]
fn lab_config_round_trips_and_rejects_narrow_blocks() {
    let cfg = LabConfig {
        shape: BlockShape::new(2, 32),
        order: StencilOrder::Order4,
        policy: StreamPolicy::Accumulate,
    };
    let json = serde_json::to_string(&cfg).unwrap();
    let back: LabConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
    assert_eq!(
        back.validate(),
        Err(MeshError::BlockTooSmall {
            axis: 0,
            extent: 2,
            required: 3
        })
    );
}

#[test]
fn block_info_and_footprint_serialize() {
    let info = BlockInfo::unit_domain(BlockId::new(3), 1, [1, 1], [8, 8]);
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["block_id"], 3);
    assert_eq!(json["index"], serde_json::json!([1, 1]));
    let back: BlockInfo = serde_json::from_value(json).unwrap();
    assert_eq!(back, info);

    let fp: StencilFootprint =
        serde_json::from_str(r#"{ "start": [-1, 0], "end": [2, 3] }"#).unwrap();
    assert!(fp.validate().is_ok());
    assert!(fp.is_within(&StencilFootprint::symmetric(2)));
}
