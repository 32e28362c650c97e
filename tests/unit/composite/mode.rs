use super::*;

#[test]
fn default_mode_is_zero() {
    assert_eq!(BlitMode::default().to_bits(), 0);
    assert_eq!(BlitMode::from_bits(0), Some(BlitMode::COPY));
}

#[test]
fn flags_are_orthogonal() {
    let m = BlitMode::ADD
        .with_source_alpha(true)
        .with_filter(Filter::Bilinear);
    assert_eq!(m.to_bits(), MODE_ADD | MODE_USE_SOURCE_ALPHA | MODE_FILTER_BILINEAR);
    assert_eq!(BlitMode::from_bits(m.to_bits()), Some(m));
}

#[test]
fn channel_copy_packs_both_indices() {
    let m = BlitMode::channel_copy(Channel::G, Channel::A);
    assert_eq!(m.to_bits(), 0xf0 | 1 | (3 << 2));
    assert_eq!(
        BlitMode::from_bits(0xf0 | 1 | (3 << 2)).unwrap().blend,
        Blend::ChannelCopy {
            src: Channel::G,
            dst: Channel::A
        }
    );
}

#[test]
fn unknown_values_are_rejected() {
    assert_eq!(BlitMode::from_bits(0x02), None);
    assert_eq!(BlitMode::from_bits(0x0200), None);
}

#[test]
fn json_shape_is_readable() {
    let m: BlitMode = serde_json::from_value(serde_json::json!({
        "blend": { "kind": "channel_copy", "src": "r", "dst": "a" },
        "filter": "bilinear"
    }))
    .unwrap();
    assert_eq!(
        m,
        BlitMode::channel_copy(Channel::R, Channel::A).with_filter(Filter::Bilinear)
    );

    let plain: BlitMode = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(plain, BlitMode::COPY);
}
