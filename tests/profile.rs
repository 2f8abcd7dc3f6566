use h2fingerprint::{FingerprintDescription, Profile, SettingId, PREFACE};

#[test]
fn chrome_117() {
    let settings = Profile::Chrome117.settings().unwrap();

    assert_eq!(
        settings.akamai_fingerprint(),
        "1:65536;2:0;4:6291456;6:262144|15663105|0|m,a,s,p"
    );
    assert_eq!(settings.get(SettingId::ENABLE_PUSH), Some(0));
    assert_eq!(settings.get(SettingId::UNKNOWN_SETTING_8), None);
    assert_eq!(settings.get(SettingId::NO_RFC7540_PRIORITIES), None);

    let header = settings.header_priority().unwrap();
    assert!(header.exclusive);
    assert_eq!(header.weight, Some(255));
}

#[test]
fn firefox_109_sends_its_priority_tree() {
    let settings = Profile::Firefox109.settings().unwrap();

    let frames = settings
        .priority_frames()
        .iter()
        .map(|f| (f.stream_id, f.param.stream_dep, f.param.weight()))
        .collect::<Vec<_>>();
    assert_eq!(
        frames,
        [
            (3, 0, 201),
            (5, 0, 101),
            (7, 0, 1),
            (9, 7, 1),
            (11, 3, 1),
            (13, 0, 241)
        ]
    );
}

#[test]
fn profiles_survive_a_json_round_trip() {
    for profile in Profile::ALL {
        let desc = profile.description();
        let text = desc.to_value().to_string();
        let parsed: FingerprintDescription = text.parse().unwrap();
        assert_eq!(parsed, desc, "{profile:?}");

        let parsed: FingerprintDescription = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, desc, "{profile:?}");
    }
}

#[test]
fn preface_starts_with_settings() {
    let bytes = Profile::Chrome117.settings().unwrap().preface_bytes();

    assert_eq!(&bytes[..PREFACE.len()], PREFACE);
    // Four SETTINGS entries of six bytes each.
    assert_eq!(&bytes[PREFACE.len()..PREFACE.len() + 5], &[0, 0, 24, 0x4, 0]);
}
