use h2fingerprint::{FingerprintDescription, Profile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A profile name, a path to a JSON description, or nothing for Chrome
    let desc = match std::env::args().nth(1).as_deref() {
        None | Some("chrome") => Profile::Chrome117.description(),
        Some("firefox") => Profile::Firefox109.description(),
        Some(path) => std::fs::read_to_string(path)?.parse::<FingerprintDescription>()?,
    };

    let settings = h2fingerprint::translate(&desc)?;

    for setting in settings.settings() {
        println!("{:<24} {}", setting.id, setting.value);
    }
    println!("akamai: {}", settings.akamai_fingerprint());

    let preface = settings.preface_bytes();
    let hex = preface
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join("");
    println!("preface ({} bytes): {}", preface.len(), hex);

    Ok(())
}
