use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama embeds templates at compile time. A directory path makes cargo
    // watch everything under it, nested folders included.
    println!("cargo:rerun-if-changed=templates");
    println!("cargo:rerun-if-changed=migrations");

    // Shown on /health and the dashboard footer.
    let build_id = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => format!("{}", elapsed.as_secs()),
        Err(_) => String::from("dev"),
    };
    println!("cargo:rustc-env=SCANNER_BUILD_ID={build_id}");
}
