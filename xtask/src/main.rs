use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "gopro-rename";
const SMOKE_DIR: &str = "target/xtask-smoke";

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install gopro-rename binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run gopro-rename with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to gopro-rename")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for gopro-rename-core"))
                .subcommand(Command::new("bin").about("Run tests for gopro-rename-bin"))
                .subcommand(Command::new("integration").about("Rename and revert a scratch directory with the built binary"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing gopro-rename...");
    cargo(&["install", "--path", "crates/gopro-rename-bin"], "Failed to install gopro-rename")?;
    println!("✓ gopro-rename installed successfully");
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running gopro-rename...");

    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let status = process::Command::new("cargo")
        .args(["run", "--bin", BIN_NAME, "--"])
        .args(&run_args)
        .status()?;

    if !status.success() {
        anyhow::bail!("Failed to run gopro-rename");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_core(),
        Some(("bin", _args)) => test_bin(),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for gopro-rename-core");
            println!("  bin          - Run tests for gopro-rename-bin");
            println!("  integration  - Rename and revert a scratch directory");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the gopro-rename project...\n");

    let suites: [(&str, fn() -> Result<()>); 4] = [
        ("📚 gopro-rename-core", test_core),
        ("🔧 gopro-rename-bin", test_bin),
        ("📖 documentation", test_docs),
        ("🔗 integration", test_integration),
    ];

    let mut failed = Vec::new();
    for (name, suite) in suites {
        println!("{} tests...", name);
        match suite() {
            Ok(()) => println!("✅ {} tests passed\n", name),
            Err(error) => {
                println!("❌ {} tests failed: {:?}\n", name, error);
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        println!("💥 Some tests failed. Please check the output above.");
        anyhow::bail!("Test suite failed: {}", failed.join(", "));
    }

    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn test_core() -> Result<()> {
    cargo(&["test", "--package", "gopro-rename-core"], "Core tests failed")
}

fn test_bin() -> Result<()> {
    cargo(&["test", "--package", "gopro-rename-bin"], "Binary tests failed")
}

fn test_docs() -> Result<()> {
    // Only the core crate has a library target
    cargo(&["test", "--doc", "--package", "gopro-rename-core"], "Documentation tests failed")
}

fn test_integration() -> Result<()> {
    cargo(&["build", "--bin", BIN_NAME], "Failed to build gopro-rename binary")?;
    let binary = Path::new("target").join("debug").join(format!("{}{}", BIN_NAME, std::env::consts::EXE_SUFFIX));

    let scratch = PathBuf::from(SMOKE_DIR);
    if scratch.exists() {
        fs::remove_dir_all(&scratch)?;
    }
    fs::create_dir_all(scratch.join("day2"))?;
    for name in ["GH010527.MP4", "GH020527.MP4", "GH010527.THM", "notes.txt"] {
        fs::write(scratch.join(name), name)?;
    }
    fs::write(scratch.join("day2").join("GX010600.MP4"), "GX010600.MP4")?;
    let original = list_files(&scratch)?;

    run_binary(&binary, &["rename", "--dry-run", SMOKE_DIR])?;
    if list_files(&scratch)? != original {
        anyhow::bail!("Dry run changed the scratch directory");
    }

    run_binary(&binary, &["rename", SMOKE_DIR])?;
    let renamed = list_files(&scratch)?;
    let expected = ["052701-GH010527.MP4", "052701-GH010527.THM", "052702-GH020527.MP4", "notes.txt"];
    if !expected.iter().all(|name| renamed.contains(&name.to_string())) {
        anyhow::bail!("Unexpected names after rename: {:?}", renamed);
    }
    if !scratch.join("day2").join("060001-GX010600.MP4").exists() {
        anyhow::bail!("Nested file was not renamed");
    }

    run_binary(&binary, &["revert", SMOKE_DIR])?;
    if list_files(&scratch)? != original {
        anyhow::bail!("Revert did not restore the original names");
    }
    if !scratch.join("day2").join("GX010600.MP4").exists() {
        anyhow::bail!("Nested file was not reverted");
    }

    fs::remove_dir_all(&scratch)?;
    Ok(())
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{}", failure);
    }
    Ok(())
}

fn run_binary(binary: &Path, args: &[&str]) -> Result<()> {
    let status = process::Command::new(binary).args(args).status()?;

    if !status.success() {
        anyhow::bail!("{} {:?} failed", BIN_NAME, args);
    }
    Ok(())
}

fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}
