use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn demos_root() -> PathBuf {
    workspace_root().join("demos")
}

pub fn demo_dir(name: &str) -> PathBuf {
    demos_root().join(name)
}

pub fn testcase_path(name: &str) -> PathBuf {
    demo_dir(name).join("testcase.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn demos_root_points_to_demos_directory() {
        assert!(demos_root().is_dir());
    }

    #[test]
    fn demo_dir_joins_name() {
        assert!(demo_dir("01-greeting").is_dir());
    }

    #[test]
    fn testcase_path_joins_default_filename() {
        let path = testcase_path("01-greeting");
        assert!(path.ends_with("testcase.json"));
        assert!(path.is_file());
    }

    #[test]
    fn every_demo_passes_its_testcase() {
        let cases = vn_tool::discover_cases(&demos_root()).expect("demos should have cases");
        assert!(cases.len() >= 7, "expected all demos, found {}", cases.len());

        for case_path in cases {
            let demo = case_path
                .parent()
                .expect("testcase should live in a demo dir")
                .to_path_buf();
            if let Err(error) = vn_tool::assert_case(&demo, &case_path) {
                panic!("demo {} failed: {}", demo.display(), error);
            }
        }
    }
}
