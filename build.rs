use std::path::Path;
use std::{env, fs};

const CONFIG_NAME: &str = "crownborn";

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let target_dir = Path::new(&out_dir).ancestors().nth(3).unwrap();
    fs::create_dir_all(target_dir).expect("Failed to create target directory");

    // Custom profiles (bench, dist, ...) reuse the release settings.
    let profile = match env::var("PROFILE").unwrap().as_str() {
        "debug" => "debug",
        _ => "release",
    };
    let source_file = format!("{CONFIG_NAME}.{profile}.toml");
    let dest_file = target_dir.join(format!("{CONFIG_NAME}.toml"));

    fs::copy(&source_file, &dest_file)
        .unwrap_or_else(|e| panic!("Failed to copy {} to {}: {}", source_file, dest_file.display(), e));

    println!("cargo:rerun-if-changed={}", source_file);
    println!("cargo:rerun-if-changed=build.rs");
}
