fn main() {
    let ver = std::env::var("GOCD_TRIGGER_VERSION")
        .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=APP_VERSION={}", ver);
    println!("cargo:rerun-if-env-changed=GOCD_TRIGGER_VERSION");
}
