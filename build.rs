fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "espidf" {
        embuild::espidf::sysenv::output();
    }

    if std::env::var("CARGO_FEATURE_TFLM").is_ok() {
        // Device builds use the g++ shipped with the embuild toolchain; host
        // builds fall back to whatever `cc` picks.
        let compiler = if target_os == "espidf" {
            Some(find_compiler().unwrap_or_else(|| "riscv32-esp-elf-g++".into()))
        } else {
            None
        };
        build_tflm(compiler.as_deref());
    }
}

fn find_compiler() -> Option<std::path::PathBuf> {
    use std::path::PathBuf;
    // Check local .embuild first, then global ~/.espressif
    let search_dirs = vec![
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").ok()?).join(".embuild"),
        dirs::home_dir().map(|h| h.join(".espressif")).unwrap_or_default(),
    ];

    for root in search_dirs {
        let tools_dir = root.join("espressif/tools/riscv32-esp-elf");
        let Ok(entries) = std::fs::read_dir(&tools_dir) else {
            continue;
        };
        // Versioned directory, e.g. esp-13.2.0_20240530
        for entry in entries.flatten() {
            let candidate = entry.path().join("riscv32-esp-elf/bin/riscv32-esp-elf-g++");
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Compile the TensorFlow Lite Micro runtime plus the `tflm_invoke` shim that
/// owns the model byte arrays and the tensor arena.
fn build_tflm(compiler: Option<&std::path::Path>) {
    use std::path::PathBuf;

    let root = PathBuf::from("tflm-models");

    let mut build = cc::Build::new();
    if let Some(compiler) = compiler {
        build.compiler(compiler);
    }

    build
        .cpp(true)
        .flag("-std=c++17")
        .flag("-O3")
        .define("TF_LITE_STATIC_MEMORY", None)
        .define("TF_LITE_DISABLE_X86_NEON", None)
        .include(&root)
        .include(root.join("third_party/flatbuffers/include"))
        .include(root.join("third_party/gemmlowp"));

    add_source_files(&mut build, &root);

    build.compile("tflm-models");

    println!("cargo:rerun-if-changed=tflm-models");
}

fn add_source_files(build: &mut cc::Build, dir: &std::path::Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => panic!("failed to read {}: {}", dir.display(), e),
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            // Kernel tests and benchmarks ship their own `main`.
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name == "tests" || name == "benchmarks" {
                continue;
            }
            add_source_files(build, &path);
        } else if let Some(ext) = path.extension() {
            if ext == "c" || ext == "cc" || ext == "cpp" {
                build.file(&path);
            }
        }
    }
}
