use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn parse_rows(content: &str) -> Vec<Vec<String>> {
    assert!(content.ends_with("\r\n"), "output must end with CRLF");
    content
        .split_terminator("\r\n")
        .map(|line| {
            assert!(!line.contains('\n') && !line.contains('\r'));
            line.split(',').map(str::to_string).collect()
        })
        .collect()
}

#[test]
fn wrong_argument_count_fails_with_usage() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = fixture("two_communities.gml");
    let output = dir.path().join("edges.csv");
    let extra = dir.path().join("extra.csv");

    let argument_lists: Vec<Vec<&Path>> = vec![
        vec![],
        vec![input.as_path()],
        vec![input.as_path(), output.as_path(), extra.as_path()],
    ];
    for arguments in argument_lists {
        let assert = Command::cargo_bin("gml2csv")?.args(&arguments).assert();
        let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
        assert.code(1);
        assert!(stderr.contains("USAGE"), "no usage in {}", stderr);
    }
    assert!(!output.exists());
    assert!(!extra.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[test]
fn converts_largest_component() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");

    Command::cargo_bin("gml2csv")?
        .arg(fixture("two_communities.gml"))
        .arg(&output)
        .assert()
        .success();

    let rows = parse_rows(&fs::read_to_string(&output)?);
    // the three node component with two edges is dropped
    assert_eq!(rows.len(), 13);
    for row in &rows {
        assert_eq!(row.len(), 6);
        for coordinate in &row[..4] {
            let value: f64 = coordinate.parse()?;
            assert!((0.0..=1.0).contains(&value), "{} out of range", value);
            assert_eq!(coordinate.split('.').nth(1).map(str::len), Some(6));
        }
        for cluster in &row[4..] {
            assert!(cluster.parse::<usize>()? < 16);
        }
    }

    // every axis reaches both bounds
    for column in 0..2 {
        let values: Vec<f64> = rows
            .iter()
            .flat_map(|r| [r[column].parse::<f64>(), r[column + 2].parse::<f64>()])
            .collect::<Result<_, _>>()?;
        assert!(values.contains(&0.0));
        assert!(values.contains(&1.0));
    }

    Ok(())
}

#[test]
fn seeded_runs_are_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    for output in [&first, &second] {
        Command::cargo_bin("gml2csv")?
            .args(["--seed", "42"])
            .arg(fixture("two_communities.gml"))
            .arg(output)
            .assert()
            .success();
    }
    let first = fs::read(&first)?;
    assert!(!first.is_empty());
    assert_eq!(first, fs::read(&second)?);

    Ok(())
}

#[test]
fn converts_edge_list() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");

    Command::cargo_bin("gml2csv")?
        .args(["--layout", "fruchterman-reingold"])
        .args(["--communities", "label-propagation", "--seed", "5"])
        .arg(fixture("interactions.csv"))
        .arg(&output)
        .assert()
        .success();

    let rows = parse_rows(&fs::read_to_string(&output)?);
    assert_eq!(rows.len(), 4);

    Ok(())
}

#[test]
fn missing_input_fails_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");

    Command::cargo_bin("gml2csv")?
        .arg(dir.path().join("does-not-exist.gml"))
        .arg(&output)
        .assert()
        .failure();
    assert!(!output.exists());

    Ok(())
}

#[test]
fn invalid_option_value_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");

    Command::cargo_bin("gml2csv")?
        .args(["--layout", "circle"])
        .arg(fixture("two_communities.gml"))
        .arg(&output)
        .assert()
        .code(1);
    assert!(!output.exists());

    Ok(())
}

#[cfg(unix)]
#[test]
fn output_has_regular_file_permissions() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");
    let regular = dir.path().join("regular.csv");
    fs::File::create(&regular)?;

    Command::cargo_bin("gml2csv")?
        .arg(fixture("two_communities.gml"))
        .arg(&output)
        .assert()
        .success();

    let mode = |path: &Path| -> std::io::Result<u32> {
        Ok(fs::metadata(path)?.permissions().mode() & 0o777)
    };
    assert_eq!(mode(&output)?, mode(&regular)?);

    Ok(())
}

#[test]
fn too_many_spins_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("edges.csv");

    Command::cargo_bin("gml2csv")?
        .args(["--spins", "100000000000000"])
        .arg(fixture("two_communities.gml"))
        .arg(&output)
        .assert()
        .code(1);
    assert!(!output.exists());

    Ok(())
}
