use super::*;

const MINIMAL: &str = r#"{"v":"5.7.0","fr":30,"ip":0,"op":60,"w":100,"h":50,"layers":[]}"#;

#[test]
fn parses_header_and_reports_info() {
    let comp = Composition::parse(MINIMAL.as_bytes()).unwrap();
    let info = comp.info();
    assert_eq!(info.total_frames, 60);
    assert_eq!(info.frame_rate, 30.0);
    assert_eq!((info.width, info.height), (100, 50));
}

#[test]
fn rejects_malformed_documents() {
    assert!(Composition::parse(b"not json").is_err());
    assert!(Composition::parse(br#"{"fr":0,"ip":0,"op":60,"w":10,"h":10}"#).is_err());
    assert!(Composition::parse(br#"{"fr":30,"ip":10,"op":10,"w":10,"h":10}"#).is_err());
    assert!(Composition::parse(br#"{"fr":30,"ip":0,"op":10,"w":0,"h":10}"#).is_err());
}

#[test]
fn unsupported_layers_and_shapes_still_parse() {
    let json = r#"{
      "fr": 25, "ip": 0, "op": 10, "w": 10, "h": 10,
      "layers": [
        { "ty": 2, "refId": "image_0", "ks": {} },
        { "ty": 4, "ks": {}, "shapes": [
            { "ty": "sh", "ks": { "a": 0, "k": { "v": [], "i": [], "o": [], "c": true } } },
            { "ty": "gr", "it": [ { "ty": "el", "p": {"a":0,"k":[5,5]}, "s": {"a":0,"k":[4,4]} } ] }
        ] }
      ]
    }"#;
    let comp = Composition::parse(json.as_bytes()).unwrap();
    assert_eq!(comp.layers.len(), 2);
    assert!(matches!(comp.layers[1].shapes[0], ShapeItem::Unsupported));
    assert!(matches!(comp.layers[1].shapes[1], ShapeItem::Group { .. }));
}

#[test]
fn layer_visibility_uses_in_and_out_points() {
    let json = r#"{"fr":30,"ip":0,"op":30,"w":10,"h":10,"layers":[
        {"ty":3,"ip":10,"op":20,"ks":{}},
        {"ty":3,"hd":true,"ks":{}}
    ]}"#;
    let comp = Composition::parse(json.as_bytes()).unwrap();
    assert!(!comp.layers[0].is_visible_at(9.0));
    assert!(comp.layers[0].is_visible_at(10.0));
    assert!(!comp.layers[0].is_visible_at(20.0));
    assert!(!comp.layers[1].is_visible_at(0.0));
}

#[test]
fn transform_defaults_are_identity() {
    let tr = Transform::default();
    assert_eq!(tr.affine(0.0), Affine::IDENTITY);
    assert_eq!(tr.opacity(0.0), 1.0);
}

#[test]
fn transform_applies_anchor_scale_and_position() {
    let tr = Transform {
        a: Some(Property::constant([5.0, 5.0])),
        p: Some(Property::constant([20.0, 10.0])),
        s: Some(Property::constant([200.0, 200.0])),
        r: None,
        o: Some(Property::constant([50.0])),
    };
    let m = tr.affine(0.0);
    assert_eq!(m * kurbo::Point::new(5.0, 5.0), kurbo::Point::new(20.0, 10.0));
    assert_eq!(m * kurbo::Point::new(6.0, 5.0), kurbo::Point::new(22.0, 10.0));
    assert_eq!(tr.opacity(0.0), 0.5);
}

#[test]
fn hex_colors() {
    assert_eq!(parse_hex_color("#ff8000").unwrap(), [255, 128, 0]);
    assert_eq!(parse_hex_color("#0f0").unwrap(), [0, 255, 0]);
    assert!(parse_hex_color("#12345").is_err());
    assert!(parse_hex_color("#zzzzzz").is_err());
}
