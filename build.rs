//! Build script that bakes the prediction service URL into the binary.
//!
//! Setting `XRAYSCOPE_API_URL` while building makes that URL the compiled-in
//! default; the same variable still overrides it at runtime.

use std::env;

const API_URL_VAR: &str = "XRAYSCOPE_API_URL";
const BAKED_API_URL_VAR: &str = "XRAYSCOPE_BUILD_API_URL";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={API_URL_VAR}");

    if let Ok(url) = env::var(API_URL_VAR)
        && let Some(url) = normalized(&url)
    {
        println!("cargo:rustc-env={BAKED_API_URL_VAR}={url}");
    }
}

fn normalized(url: &str) -> Option<&str> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
