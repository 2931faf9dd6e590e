use std::fs;
use std::path::{Path, PathBuf};
use clap::Parser;
use tempdir::TempDir;
use mdrive_core::Error;
use crate::args::{Args, Commands, LogField};
use crate::commands::{check, dry_run, DryRunOutput};

const WATER_DIMER_PRMTOP: &str = "\
%VERSION  VERSION_STAMP = V0001.000  DATE = 01/01/24  00:00:00
%FLAG TITLE
%FORMAT(20a4)
water dimer
%FLAG POINTERS
%FORMAT(10I8)
       6       2       4       2       2       0       0       0       0       0
       8       2       2       0       0       0       0       0       0       1
       0       0       0       0       0       0       0       1       3       0
       0
%FLAG ATOM_NAME
%FORMAT(20a4)
O   H1  H2  O   H1  H2
%FLAG CHARGE
%FORMAT(5E16.8)
 -1.51973982E+01  7.59869910E+00  7.59869910E+00 -1.51973982E+01  7.59869910E+00
  7.59869910E+00
%FLAG MASS
%FORMAT(5E16.8)
  1.60000000E+01  1.00800000E+00  1.00800000E+00  1.60000000E+01  1.00800000E+00
  1.00800000E+00
%FLAG RESIDUE_LABEL
%FORMAT(20a4)
WAT WAT
%FLAG RESIDUE_POINTER
%FORMAT(10I8)
       1       4
%FLAG BONDS_INC_HYDROGEN
%FORMAT(10I8)
       0       3       1       0       6       1       9      12       1       9
      15       1
%FLAG BONDS_WITHOUT_HYDROGEN
%FORMAT(10I8)

%FLAG BOX_DIMENSIONS
%FORMAT(5E16.8)
  9.00000000E+01  2.00000000E+01  2.00000000E+01  2.00000000E+01
";

const WATER_DIMER_INPCRD: &str = "\
water dimer
     6
   0.0000000   0.0000000   0.0000000   0.9572000   0.0000000   0.0000000
  -0.2399872   0.9266272   0.0000000   3.0000000   0.0000000   0.0000000
   3.9572000   0.0000000   0.0000000   2.7600128   0.9266272   0.0000000
  20.0000000  20.0000000  20.0000000  90.0000000  90.0000000  90.0000000
";

fn write_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
    let coordinates = dir.path().join("input.inpcrd");
    let topology = dir.path().join("input.prmtop");
    fs::write(&coordinates, WATER_DIMER_INPCRD).expect("Can't write coordinates");
    fs::write(&topology, WATER_DIMER_PRMTOP).expect("Can't write topology");
    (coordinates, topology)
}

fn output<'a>(trajectory: &'a Path, log: &'a Path, fields: &'a [LogField]) -> DryRunOutput<'a> {
    DryRunOutput {
        trajectory,
        trajectory_interval: 1000,
        log: Some(log),
        log_interval: 1000,
        fields,
        progress: false,
    }
}

#[test]
fn arguments() {
    let args = Args::try_parse_from(["mdrive", "-c", "a.rst7", "-p", "a.prmtop", "dry-run",
                                     "--steps", "500", "--fields", "step,kinetic-energy"])
        .expect("Can't parse arguments");
    assert_eq!(args.coordinates, PathBuf::from("a.rst7"));
    assert_eq!(args.topology, PathBuf::from("a.prmtop"));
    assert!(args.options.is_none());
    match args.command {
        Commands::DryRun { steps, trajectory, fields, log, .. } => {
            assert_eq!(steps, 500);
            assert_eq!(trajectory, PathBuf::from("output.dcd"));
            assert_eq!(fields, vec![LogField::Step, LogField::KineticEnergy]);
            assert!(log.is_none());
        }
        _ => panic!("expected dry-run"),
    }
    let args = Args::try_parse_from(["mdrive", "check"]).expect("Can't parse arguments");
    assert_eq!(args.coordinates, PathBuf::from("input.inpcrd"));
    assert!(matches!(args.command, Commands::Check));
}

#[test]
fn check_inputs() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (coordinates, topology) = write_inputs(&dir);
    let report = check(&coordinates, &topology, None).expect("Can't check inputs");
    assert!(report.contains("atoms: 6"));
    assert!(report.contains("bonds: 4 (4 with hydrogen)"));
    assert!(report.contains("degrees of freedom: 9"));
    assert!(report.contains("\"electrostatics_method\": \"pme\""));
}

#[test]
fn check_missing_file() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (coordinates, _) = write_inputs(&dir);
    let missing = dir.path().join("missing.prmtop");
    let err = check(&coordinates, &missing, None).expect_err("missing topology must fail");
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert_eq!(err.stage(), "load");
}

#[test]
fn check_bad_options() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (coordinates, topology) = write_inputs(&dir);
    let options = dir.path().join("options.json");
    fs::write(&options, "{\"cutoff_distance\": 1.5}").expect("Can't write options");
    let err = check(&coordinates, &topology, Some(&options)).expect_err("cutoff above half box must fail");
    assert_eq!(err.stage(), "configure");
}

#[test]
fn dry_run_end_to_end() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (coordinates, topology) = write_inputs(&dir);
    let trajectory = dir.path().join("output.dcd");
    let log = dir.path().join("output.csv");
    let fields = [LogField::Step, LogField::PotentialEnergy, LogField::Temperature];
    let state = dry_run(&coordinates, &topology, None, 10000, Some(1), 10.0, 0,
                        &output(&trajectory, &log, &fields))
        .expect("Can't run");
    assert_eq!(state.step, 10000);
    assert_eq!(state.potential_energy, 0.0);
    assert!(state.temperature > 0.0);

    let bytes = fs::read(&trajectory).expect("Can't read trajectory");
    assert_eq!(bytes.len(), 276 + 10 * (56 + 3 * (8 + 4 * 6)));
    assert_eq!(i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 10);

    let text = fs::read_to_string(&log).expect("Can't read log");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "#\"Step\",\"Potential Energy (kJ/mole)\",\"Temperature (K)\"");
    assert!(lines[1].starts_with("1000,0,"));
    assert!(lines[10].starts_with("10000,0,"));
}

#[test]
fn dry_run_unwritable_output() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (coordinates, topology) = write_inputs(&dir);
    let trajectory = dir.path().join("missing").join("output.dcd");
    let log = dir.path().join("output.csv");
    let err = dry_run(&coordinates, &topology, None, 100, Some(1), 10.0, 0,
                      &output(&trajectory, &log, &[LogField::Step]))
        .expect_err("trajectory in a missing directory must fail");
    assert!(matches!(err, Error::Sink { ref path, .. } if *path == trajectory));
    assert_eq!(err.stage(), "report");

    let trajectory = dir.path().join("output.dcd");
    let log = dir.path().join("missing").join("output.csv");
    let err = dry_run(&coordinates, &topology, None, 100, Some(1), 10.0, 0,
                      &output(&trajectory, &log, &[LogField::Step]))
        .expect_err("log in a missing directory must fail");
    assert_eq!(err.stage(), "report");
}

#[test]
fn dry_run_mismatched_inputs() {
    let dir = TempDir::new("mdrive_cli").expect("Can't create temp directory");
    let (_, topology) = write_inputs(&dir);
    let coordinates = dir.path().join("short.inpcrd");
    fs::write(&coordinates, "short\n     1\n   0.0000000   0.0000000   0.0000000\n")
        .expect("Can't write coordinates");
    let trajectory = dir.path().join("output.dcd");
    let log = dir.path().join("output.csv");
    let err = dry_run(&coordinates, &topology, None, 100, None, 10.0, 0,
                      &output(&trajectory, &log, &[LogField::Step]))
        .expect_err("atom count mismatch must fail");
    assert!(matches!(err, Error::Configuration(_)));
    assert!(!trajectory.exists());
}
