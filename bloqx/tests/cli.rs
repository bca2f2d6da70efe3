#[cfg(test)]
mod test {
    use assert_cmd::Command;
    use predicates::{ord::eq, str::contains};
    use rstest::{fixture, rstest};

    #[fixture]
    fn report() -> Command {
        let mut cmd = Command::cargo_bin("bloqx").unwrap();
        cmd.arg("report");
        cmd
    }

    #[fixture]
    fn dot() -> Command {
        let mut cmd = Command::cargo_bin("bloqx").unwrap();
        cmd.arg("dot");
        cmd
    }

    #[fixture]
    fn catalog() -> Command {
        let mut cmd = Command::cargo_bin("bloqx").unwrap();
        cmd.arg("catalog");
        cmd
    }

    #[rstest]
    fn report_example(mut report: Command) {
        report
            .arg("mod_exp_small")
            .assert()
            .success()
            .stdout(contains("mod_exp_small: 7^e % 15"))
            .stdout(contains("t-complexity: t:"))
            .stdout(contains("leaf tally:"));
    }

    #[rstest]
    fn report_custom_eps(mut report: Command) {
        report
            .arg("rz")
            .arg("--eps")
            .arg("1e-3")
            .assert()
            .success()
            .stdout(contains("total T at eps 1e-3:"));
    }

    #[rstest]
    fn report_to_file(mut report: Command) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        report
            .arg("and")
            .arg("--out")
            .arg(&path)
            .assert()
            .success()
            .stdout(eq(""));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("summary: 4 T, 0 Toffoli, 0 rotations"));
    }

    #[rstest]
    fn report_unknown_name(mut report: Command) {
        report
            .arg("not_a_bloq")
            .assert()
            .failure()
            .stderr(contains("no catalog example named 'not_a_bloq'"));
    }

    #[rstest]
    fn dot_example(mut dot: Command) {
        dot.arg("toffoli")
            .assert()
            .success()
            .stdout(contains("digraph {"));
    }

    #[rstest]
    fn dot_flattened(mut dot: Command) {
        dot.arg("multi_and")
            .arg("--flatten")
            .assert()
            .success()
            .stdout(contains("digraph {"));
    }

    #[rstest]
    fn dot_of_a_leaf(mut dot: Command) {
        dot.arg("rz")
            .assert()
            .failure()
            .stderr(contains("bloq does not define a decomposition"));
    }

    #[rstest]
    fn catalog_listing(mut catalog: Command) {
        catalog
            .assert()
            .success()
            .stdout(contains("toffoli"))
            .stdout(contains("qubitization_walk"));
    }

    #[rstest]
    fn catalog_filtered(mut catalog: Command) {
        catalog
            .arg("^ising")
            .assert()
            .success()
            .stdout(eq("ising_zz\nising_x\n"));
    }

    #[rstest]
    fn catalog_markdown(mut catalog: Command) {
        catalog
            .arg("--markdown")
            .arg("^and$")
            .assert()
            .success()
            .stdout(contains("| name | bloq | T | clifford | rotations |"))
            .stdout(contains("| and | And | 4 | 9 | 0 |"));
    }

    #[rstest]
    fn catalog_check(mut catalog: Command) {
        catalog
            .arg("--check")
            .assert()
            .success()
            .stdout(contains("examples ok"));
    }

    #[rstest]
    fn catalog_bad_filter(mut catalog: Command) {
        catalog
            .arg("(")
            .assert()
            .failure()
            .stderr(contains("invalid filter"));
    }
}
