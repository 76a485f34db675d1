use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use tikzcd_cli::{Args, CliError, InputFormat, OutputFormat, run};

/// Collects all .tex files from a directory
fn collect_tex_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tex")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path, from: InputFormat, to: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        from,
        to,
        align: false,
        no_align: false,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_tex_files(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();
        let tex_path = temp_dir.path().join(format!("{stem}.tex"));
        let json_path = temp_dir.path().join(format!("{stem}.json"));
        let compressed_path = temp_dir.path().join(format!("{stem}.lz"));
        let final_path = temp_dir.path().join(format!("{stem}.final.tex"));

        // tex -> tex -> json -> compressed -> tex
        let steps = [
            args(demo_path, &tex_path, InputFormat::Tex, OutputFormat::Tex),
            args(&tex_path, &json_path, InputFormat::Tex, OutputFormat::Json),
            args(&json_path, &compressed_path, InputFormat::Json, OutputFormat::Compressed),
            args(&compressed_path, &final_path, InputFormat::Compressed, OutputFormat::Tex),
        ];

        if let Some(err) = steps.iter().find_map(|step| run(step).err()) {
            failed_demos.push((demo_path.clone(), err.to_string()));
            continue;
        }

        let rendered = fs::read_to_string(&tex_path).expect("Failed to read rendered markup");
        let round_tripped = fs::read_to_string(&final_path).expect("Failed to read final markup");
        if rendered != round_tripped {
            failed_demos.push((demo_path.clone(), "markup changed on round trip".to_string()));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_tex_files(demos_path().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpected_successes = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join("out.tex");
        let args = args(demo_path, &output_path, InputFormat::Tex, OutputFormat::Tex);

        match run(&args) {
            Err(CliError::Tikzcd(_)) => {}
            Err(other) => panic!("{}: unexpected error kind: {other}", demo_path.display()),
            Ok(()) => unexpected_successes.push(demo_path.clone()),
        }
    }

    if !unexpected_successes.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpected_successes {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) should have failed but succeeded",
            unexpected_successes.len()
        );
    }

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args(
        &temp_dir.path().join("missing.tex"),
        &temp_dir.path().join("out.tex"),
        InputFormat::Tex,
        OutputFormat::Tex,
    );

    assert!(matches!(run(&args), Err(CliError::Io(_))));
}

#[test]
fn e2e_permalink_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[permalink]\nbase_url = \"https://example.org/editor/\"\n",
    )
    .expect("Failed to write config");

    let demo_path = demos_path().join("square.tex");
    let tex_path = temp_dir.path().join("square.tex");
    let link_path = temp_dir.path().join("square.link");
    let final_path = temp_dir.path().join("square.final.tex");

    let mut to_link = args(&demo_path, &link_path, InputFormat::Tex, OutputFormat::Link);
    to_link.config = Some(config_path.to_string_lossy().to_string());
    run(&to_link).expect("Failed to write link");
    run(&args(&demo_path, &tex_path, InputFormat::Tex, OutputFormat::Tex))
        .expect("Failed to render demo");

    let link = fs::read_to_string(&link_path).expect("Failed to read link");
    assert!(link.starts_with("https://example.org/editor/#"));

    run(&args(&link_path, &final_path, InputFormat::Link, OutputFormat::Tex))
        .expect("Failed to decode link");

    let rendered = fs::read_to_string(&tex_path).expect("Failed to read rendered markup");
    let decoded = fs::read_to_string(&final_path).expect("Failed to read decoded markup");
    assert_eq!(rendered, decoded);
}
