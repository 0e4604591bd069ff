//! 表达式树集成测试
//!
//! 覆盖从表达式文本到遍历结果、汇编清单和输出文件的完整流程。

use std::fs;
use std::path::Path;
use std::process::Command;

use exprtree::codegen::instruction::{PRINT_EPILOGUE, TERMINATOR};
use exprtree::{CodegenOptions, Compiler, ExprError, build_tree, generate_code, infix, postfix, prefix};

/// 运行 exprc 并返回标准输出
fn run_exprc(args: &[&str]) -> Result<String, String> {
    run_exprc_in(None, args)
}

/// 在指定工作目录下运行 exprc
fn run_exprc_in(dir: Option<&Path>, args: &[&str]) -> Result<String, String> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_exprc"));
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    let output = command
        .args(args)
        .output()
        .map_err(|e| format!("Failed to execute exprc: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("exprc failed: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn postfix_tokens_of(source: &str) -> Vec<String> {
    postfix(&build_tree(source).unwrap())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_traversals_of_mixed_precedence() {
    let tree = build_tree("3 + 4 * 2").unwrap();
    assert_eq!(postfix(&tree), "3 4 2 * +");
    assert_eq!(prefix(&tree), "+ 3 * 4 2");
    assert_eq!(infix(&tree), "3 + 4 * 2");
}

#[test]
fn test_left_to_right_grouping() {
    assert_eq!(postfix(&build_tree("8 - 4 - 2").unwrap()), "8 4 - 2 -");
    assert_eq!(postfix(&build_tree("8 / 4 * 2").unwrap()), "8 4 / 2 *");
    assert_eq!(postfix(&build_tree("2 ^ 3 ^ 2").unwrap()), "2 3 ^ 2 ^");
}

#[test]
fn test_parentheses_override() {
    assert_eq!(postfix(&build_tree("(3 + 4) * 2").unwrap()), "3 4 + 2 *");
    assert_eq!(prefix(&build_tree("a * (b - (c + d))").unwrap()), "* a - b + c d");
}

#[test]
fn test_node_counts_match_tokens() {
    let cases = [
        ("x", 1, 0),
        ("a + b", 2, 1),
        ("(alpha + 12) * beta ^ 2 - 7 / q", 6, 5),
        ("((1))", 1, 0),
    ];
    for (source, leaves, internals) in cases {
        let tree = build_tree(source).unwrap();
        assert_eq!(tree.leaf_count(), leaves, "leaves of {}", source);
        assert_eq!(tree.internal_count(), internals, "internals of {}", source);
    }
}

#[test]
fn test_malformed_expressions() {
    for source in ["", "3 +", "3 4"] {
        assert!(
            matches!(build_tree(source), Err(ExprError::MalformedExpression { .. })),
            "{:?} should be malformed",
            source
        );
    }
}

#[test]
fn test_unclosed_parenthesis_fails() {
    assert!(matches!(
        build_tree("(3 + 4"),
        Err(ExprError::UnbalancedParentheses { .. })
    ));
}

#[test]
fn test_codegen_rejects_variables() {
    let tokens = postfix_tokens_of("x + 2");
    assert_eq!(
        generate_code(&tokens),
        Err(ExprError::NonNumericOperand {
            tokens: vec!["x".to_string(), "2".to_string(), "+".to_string()]
        })
    );
}

#[test]
fn test_codegen_exact_listing() {
    let listing = generate_code(&["3", "4", "+"]).unwrap();

    let mut expected: Vec<String> = [
        ".model small",
        ".stack 100h",
        ".data",
        "TEMP0 DW ?",
        "TEMP1 DW ?",
        "TEMP2 DW ?",
        ".code",
        "main proc",
        "MOV TEMP0, 3",
        "MOV TEMP1, 4",
        "MOV AX, TEMP0",
        "ADD AX, TEMP1",
        "MOV TEMP2, AX",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    expected.extend(PRINT_EPILOGUE.iter().map(|s| s.to_string()));
    expected.extend(TERMINATOR.iter().map(|s| s.to_string()));

    assert_eq!(listing.lines(), expected);
}

#[test]
fn test_compatible_listing_matches_default_for_well_formed_input() {
    let tokens = postfix_tokens_of("(12 + 3) * 4 - 6 / 2");
    let strict = generate_code(&tokens).unwrap();
    let compatible = exprtree::codegen::generate_with(&tokens, CodegenOptions::compatible()).unwrap();
    assert_eq!(strict, compatible);
    assert_eq!(strict.declared_temps(), tokens.len());
}

#[test]
fn test_traversal_idempotence() {
    let tree = build_tree("(a + b) * c ^ d").unwrap();
    let first = (prefix(&tree), infix(&tree), postfix(&tree));
    let second = (prefix(&tree), infix(&tree), postfix(&tree));
    assert_eq!(first, second);
}

#[test]
fn test_compiler_rejects_blank_input() {
    let compiler = Compiler::new();
    match compiler.traversals("   \n") {
        Err(ExprError::MalformedExpression { reason, .. }) => {
            assert_eq!(reason, "no expression provided");
        }
        other => panic!("expected malformed expression, got {:?}", other),
    }
}

#[test]
fn test_compiler_writes_listing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("NEWCODE.asm");

    let listing = Compiler::new().compile(" 2 * (3 + 4) ", &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();

    assert_eq!(written, listing.to_string());
    assert!(written.starts_with(".model small\n.stack 100h\n.data\n"));
    assert!(written.ends_with("main endp\nend main"));
}

#[test]
fn test_compiler_does_not_write_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.asm");

    let err = Compiler::new().compile("y * 2", &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExprError>(),
        Some(ExprError::NonNumericOperand { .. })
    ));
    assert!(!path.exists());
}

#[test]
fn test_cli_traverse() {
    let output = run_exprc(&["traverse", "3 + 4 * 2"]).expect("traverse should succeed");
    assert!(output.contains("+ 3 * 4 2"), "got: {}", output);
    assert!(output.contains("3 4 2 * +"), "got: {}", output);
}

#[test]
fn test_cli_asm_stdout() {
    let output = run_exprc(&["asm", "--stdout", "3 + 4"]).expect("asm should succeed");
    assert!(output.contains("ADD AX, TEMP1"), "got: {}", output);
}

#[test]
fn test_cli_reports_errors() {
    let err = run_exprc(&["asm", "--stdout", "x + 1"]).unwrap_err();
    assert!(err.contains("contains variables"), "got: {}", err);
}

#[test]
fn test_cli_tree_dot() {
    let output = run_exprc(&["tree", "--dot", "1 - 2"]).expect("tree should succeed");
    assert!(output.contains("n0 -> n1;"), "got: {}", output);
}

#[test]
fn test_cli_asm_writes_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_exprc_in(Some(dir.path()), &["asm", "2 * (3 + 4)"]).expect("asm should succeed");
    assert!(output.contains("NEWCODE.asm"), "got: {}", output);

    let written = fs::read_to_string(dir.path().join("NEWCODE.asm")).unwrap();
    assert!(written.starts_with(".model small"), "got: {}", written);
    assert!(written.contains("IMUL TEMP"), "got: {}", written);
}

#[test]
fn test_cli_asm_compatible() {
    let output = run_exprc(&["asm", "--stdout", "--compatible", "7"]).expect("asm should succeed");
    assert!(output.contains("MOV TEMP0, 7"), "got: {}", output);
    assert!(!output.contains("MOV AX, TEMP0"), "got: {}", output);

    let strict = run_exprc(&["asm", "--stdout", "7"]).expect("asm should succeed");
    assert!(strict.contains("MOV AX, TEMP0"), "got: {}", strict);
}

#[test]
fn test_cli_power_needs_compatible() {
    let err = run_exprc(&["asm", "--stdout", "2 ^ 3"]).unwrap_err();
    assert!(err.contains("^"), "got: {}", err);

    let output = run_exprc(&["asm", "--stdout", "--compatible", "2 ^ 3"]).expect("compatible asm should succeed");
    assert!(output.contains("MOV TEMP1, 3"), "got: {}", output);
    assert!(output.ends_with("end main\n") || output.ends_with("end main"), "got: {}", output);
}

#[test]
fn test_cli_tree_edges() {
    let output = run_exprc(&["tree", "1 - 2"]).expect("tree should succeed");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec!["0\t-\t-", "1\t0\t1", "2\t0\t2"]);
}

#[test]
fn test_cli_tree_layout() {
    let output = run_exprc(&["tree", "--layout", "1 - 2"]).expect("tree should succeed");
    assert!(output.contains("0\t-\t-\t0.5000\t0.0000"), "got: {}", output);
    assert!(output.contains("1\t0\t1\t0.2500\t-0.2000"), "got: {}", output);
    assert!(output.contains("2\t0\t2\t0.7500\t-0.2000"), "got: {}", output);
}

fn long_chain(operands: usize) -> String {
    vec!["1"; operands].join("+")
}

#[test]
fn test_very_long_expression() {
    let source = long_chain(100_000);
    let tree = build_tree(&source).unwrap();
    assert_eq!(tree.leaf_count(), 100_000);
    assert_eq!(tree.internal_count(), 99_999);

    let tokens: Vec<String> = postfix(&tree).split(' ').map(str::to_string).collect();
    assert_eq!(tokens.len(), 199_999);
    assert_eq!(prefix(&tree).len(), source.len() * 2 - 1);
    assert_eq!(exprtree::graph::edges(&tree).len(), 199_999);

    let listing = generate_code(&tokens).unwrap();
    assert_eq!(listing.declared_temps(), 199_999);
    drop(tree);
}

#[test]
fn test_cli_very_long_expression_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.txt");
    fs::write(&path, long_chain(200_000)).unwrap();

    let output = run_exprc(&["traverse", "--file", path.to_str().unwrap()]).expect("traverse should succeed");
    assert!(output.contains("1 1 + 1 +"), "got a {} byte output", output.len());
}
