// The dashboard bundle is produced by `trunk build` in frontend/. rust_embed
// needs the folder at compile time, so builds without a bundle get a stub page.

use std::fs;
use std::path::Path;

const STUB: &str = "<!doctype html>\n<title>a11yboard</title>\n<p>Dashboard bundle not built. Run <code>trunk build --release</code> in <code>frontend/</code>.</p>\n";

fn main() -> std::io::Result<()> {
    let dist = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../frontend/dist");
    let index = dist.join("index.html");
    if !index.exists() {
        fs::create_dir_all(&dist)?;
        fs::write(&index, STUB)?;
    }
    println!("cargo:rerun-if-changed=../../frontend/dist");
    Ok(())
}
