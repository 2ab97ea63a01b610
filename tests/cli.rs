#![cfg(feature = "cli")]
use assert_cmd::Command;
use insta::assert_snapshot;
use predicates::str::contains;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn avrogen(out: &Path) -> Command {
    let mut cmd = Command::cargo_bin("avrogen").unwrap();
    cmd.arg("--no-black").arg("--output-dir").arg(out);
    cmd
}

#[test]
fn weather_dataclass() {
    let dir = tempdir().unwrap();
    avrogen(dir.path())
        .arg("--prefix")
        .arg("com.example.")
        .arg(fixture("weather.avsc"))
        .assert()
        .success();

    let weather = fs::read_to_string(dir.path().join("my/test/weather.py")).unwrap();
    assert_eq!(
        weather,
        concat!(
            "from dataclasses import dataclass, field\n",
            "from typing import Dict, List, Union\n",
            "from my.test.sky_condition import SkyCondition\n",
            "from my.test.station import Station\n",
            "\n\n",
            "@dataclass\n",
            "class Weather:\n",
            "    \"\"\"A weather reading.\"\"\"\n",
            "\n",
            "    station: Station\n",
            "    time: int\n",
            "    sky: SkyCondition\n",
            "    extra: Dict[str, Union[str, bool]]\n",
            "    temp: int = 0\n",
            "    tags: List[str] = field(default_factory=list)\n",
        )
    );

    let station = fs::read_to_string(dir.path().join("my/test/station.py")).unwrap();
    assert_snapshot!("station_dataclass", station);

    let sky = fs::read_to_string(dir.path().join("my/test/sky_condition.py")).unwrap();
    assert_eq!(
        sky,
        "from typing import Literal\n\n\nSkyCondition = Literal[\"CLEAR\", \"CLOUDY\"]\n"
    );

    assert!(dir.path().join("my/__init__.py").exists());
    assert!(dir.path().join("my/test/__init__.py").exists());
    assert!(!dir.path().join("com").exists());
}

#[test]
fn weather_typed_dict() {
    let dir = tempdir().unwrap();
    avrogen(dir.path())
        .args(["--class-type", "TypedDict", "--prefix", "com.example."])
        .arg(fixture("weather.avsc"))
        .assert()
        .success();

    let weather = fs::read_to_string(dir.path().join("my/test/weather.py")).unwrap();
    assert_eq!(
        weather,
        concat!(
            "from typing import Dict, List, TypedDict, Union\n",
            "from my.test.sky_condition import SkyCondition\n",
            "from my.test.station import Station\n",
            "\n\n",
            "class Weather(TypedDict):\n",
            "    \"\"\"A weather reading.\"\"\"\n",
            "\n",
            "    station: Station\n",
            "    time: int\n",
            "    temp: int\n",
            "    sky: SkyCondition\n",
            "    tags: List[str]\n",
            "    extra: Dict[str, Union[str, bool]]\n",
        )
    );
}

#[rstest]
#[case("dataclass")]
#[case("TypedDict")]
fn self_reference_is_deferred(#[case] class_type: &str) {
    let dir = tempdir().unwrap();
    avrogen(dir.path())
        .args(["--class-type", class_type])
        .arg(fixture("tree.avsc"))
        .assert()
        .success();

    let node = fs::read_to_string(dir.path().join("tree/node.py")).unwrap();
    assert!(node.contains("    children: List[\"Node\"]\n"));
    assert!(node.contains("    parent: Optional[\"Node\"]"));
    assert!(node.contains("    index: Dict[str, \"Node\"]"));
    assert!(!node.contains("import Node"));
}

#[test]
fn ordered_manifest_resolves_across_files() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("schemas.toml");
    fs::write(
        &manifest,
        format!(
            "measure = [{:?}, {:?}]\n",
            fixture("unit.avsc"),
            fixture("reading.avsc")
        ),
    )
    .unwrap();
    let out = dir.path().join("out");

    avrogen(&out)
        .arg("--ordered")
        .arg(&manifest)
        .arg("ignored-when-ordered.avsc")
        .assert()
        .success();

    let reading = fs::read_to_string(out.join("measure/reading.py")).unwrap();
    assert_eq!(
        reading,
        concat!(
            "from dataclasses import dataclass\n",
            "from measure.unit import Unit\n",
            "\n\n",
            "@dataclass\n",
            "class Reading:\n",
            "    value: float\n",
            "    unit: Unit\n",
        )
    );
    assert!(out.join("measure/unit.py").exists());
    assert!(out.join("measure/__init__.py").exists());
}

#[test]
fn schema_from_stdin() {
    let dir = tempdir().unwrap();
    avrogen(dir.path())
        .arg("-")
        .write_stdin(fs::read_to_string(fixture("unit.avsc")).unwrap())
        .assert()
        .success();
    assert!(dir.path().join("measure/unit.py").exists());
}

#[test]
fn descriptor_table_is_written() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("types.json");
    avrogen(dir.path())
        .arg("--descriptors")
        .arg(&table)
        .arg(fixture("tree.avsc"))
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&table).unwrap()).unwrap();
    assert_eq!(json["tree.Node"]["type"], "record");
    assert_eq!(
        json["tree.Node"]["fields"][1]["type"],
        serde_json::json!({"kind": "list", "of": {"kind": "named", "of": "tree.Node"}})
    );
}

#[test]
fn unknown_primitive_fails_the_run() {
    let dir = tempdir().unwrap();
    avrogen(dir.path())
        .arg(fixture("bytes.avsc"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("unknown primitive type `bytes`"));
    assert!(!dir.path().join("raw/blob.py").exists());
}

#[test]
fn missing_formatter_fails_the_run() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("avrogen")
        .unwrap()
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--formatter", "avrogen-no-such-formatter"])
        .arg(fixture("unit.avsc"))
        .assert()
        .failure()
        .stderr(contains("avrogen-no-such-formatter"));
}
