// build.rs

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FBCLIENT_LIB_DIR");

    if let Ok(user_specified_dir) = std::env::var("FBCLIENT_LIB_DIR") {
        // https://doc.rust-lang.org/cargo/reference/build-scripts.html#cargorustc-link-searchkindpath
        println!("cargo:rustc-link-search={}", user_specified_dir);

        #[cfg(feature = "linking")]
        println!("cargo:rustc-link-lib=dylib=fbclient");
        return;
    }

    #[cfg(all(feature = "linking", not(target_os = "windows")))]
    println!("cargo:rustc-link-lib=dylib=fbclient");

    #[cfg(all(feature = "linking", target_os = "windows"))]
    search_on_windows();
}

#[cfg(all(feature = "linking", target_os = "windows"))]
fn search_on_windows() {
    let install_dirs = [
        "C:\\Program Files\\Firebird\\Firebird*",
        "C:\\Firebird*",
        "C:\\vcpkg\\installed\\*\\lib",
    ];

    for lib_name in &["fbclient_ms.lib", "fbclient.lib"] {
        for install_dir in &install_dirs {
            let pattern = format!("{}\\**\\{}", install_dir, lib_name);
            let found = match glob::glob(&pattern) {
                Ok(paths) => paths,
                Err(_) => continue,
            };

            for path in found.flatten().filter(|p| p.is_file()) {
                if let Some(dir) = path.parent() {
                    println!("cargo:rustc-link-search={}", dir.display());
                    println!("cargo:rustc-link-lib=dylib={}", lib_name.trim_end_matches(".lib"));
                    return;
                }
            }
        }
    }
}
