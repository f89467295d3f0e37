//! Unit tests for Ninja file generation.

use camino::Utf8PathBuf;
use irpninja::config::Toolchain;
use irpninja::ir::{BuildEdge, BuildGraph, EdgeGroup, GroupKind};
use irpninja::ninja_gen::generate;
use irpninja::paths::BuildPaths;
use irpninja::rules::{RuleName, RuleTable};
use rstest::rstest;

fn toolchain() -> Toolchain {
    Toolchain {
        fc: "fc".into(),
        cc: "cc".into(),
        cxx: "cxx".into(),
        fcflags: String::new(),
        cflags: "-g".into(),
        cxxflags: String::new(),
        lib: "-lm".into(),
    }
}

#[rstest]
fn rules_then_groups_in_order() {
    let graph = BuildGraph {
        rules: RuleTable::new(&toolchain(), &BuildPaths::new("/p"), &[] as &[&str]),
        groups: vec![
            EdgeGroup {
                kind: GroupKind::Target("main".into()),
                edges: vec![BuildEdge::new(
                    "/p/main".into(),
                    RuleName::Link,
                    vec!["/p/IRPF90_temp/main.irp.o".into()],
                )],
            },
            EdgeGroup {
                kind: GroupKind::FreeStanding("/p/x.c".into()),
                edges: vec![
                    BuildEdge::new(
                        "/p/IRPF90_temp/x.o".into(),
                        RuleName::CompileC,
                        vec!["/p/x.c".into()],
                    )
                    .with_implicit([Utf8PathBuf::from("/p/x.h")]),
                ],
            },
        ],
        executables: vec!["main".into()],
    };

    let expected = concat!(
        "rule compile_fortran\n",
        "  command = fc -I /p/IRPF90_temp -c $in -o $out\n\n",
        "rule compile_touches\n",
        "  command = fc -I /p/IRPF90_temp -c $in -o $out\n\n",
        "rule compile_c\n",
        "  command = cc -I /p/IRPF90_temp -g -c $in -o $out\n\n",
        "rule compile_cxx\n",
        "  command = cxx -I /p/IRPF90_temp -c $in -o $out\n\n",
        "rule link\n",
        "  command = fc -I /p/IRPF90_temp $in -lm -o $out\n\n",
        "build /p/main: link /p/IRPF90_temp/main.irp.o\n\n",
        "build /p/IRPF90_temp/x.o: compile_c /p/x.c | /p/x.h\n\n",
    );
    assert_eq!(generate(&graph), expected);
}

#[rstest]
fn paths_with_spaces_are_escaped() {
    let graph = BuildGraph {
        rules: RuleTable::new(&toolchain(), &BuildPaths::new("/p"), &[] as &[&str]),
        groups: vec![EdgeGroup {
            kind: GroupKind::FreeStanding("/my dir/a.c".into()),
            edges: vec![BuildEdge::new(
                "/my dir/IRPF90_temp/a.o".into(),
                RuleName::CompileC,
                vec!["/my dir/a.c".into()],
            )],
        }],
        executables: Vec::new(),
    };
    assert!(
        generate(&graph).ends_with("build /my$ dir/IRPF90_temp/a.o: compile_c /my$ dir/a.c\n\n")
    );
}
