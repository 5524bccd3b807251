#[cfg(feature = "potrace")]
fn add_binding(header_path: &str) {
    use std::env;
    use std::path::PathBuf;

    println!("cargo:rerun-if-changed={}", header_path);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let binding_path = out_dir.join(header_path.replace(".h", ".rs"));
    std::fs::create_dir_all(binding_path.parent().unwrap())
        .unwrap_or_else(|_| panic!("Cannot create directory for {}", binding_path.display()));

    bindgen::Builder::default()
        .header(header_path)
        .rust_edition(bindgen::RustEdition::Edition2024)
        .allowlist_type("potrace_.*")
        .allowlist_function("potrace_.*")
        .allowlist_var("POTRACE_.*")
        .default_macro_constant_type(bindgen::MacroTypeVariation::Signed)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .unwrap_or_else(|_| panic!("Unable to generate binding {}", header_path))
        .write_to_file(&binding_path)
        .expect("Cannot write binding");
}

fn main() {
    #[cfg(feature = "potrace")]
    {
        add_binding("src/potrace/wrapper.h");
        println!("cargo:rustc-link-lib=potrace");
    }
}
