//! End-to-end front-end tests: source text through lexing, parsing and
//! semantic analysis.

use simpl_frontend::ast::{Stmt, TypeName};
use simpl_frontend::{analyze, parse, ParseError, Pos, SemanticError};

const FACTORIAL: &str = r#"
func fact(number n) {
    if n <= 1 {
        return 1;
    }
    return n * fact(n - 1);
}

func main() {
    number result = fact(5);
    print(result);
}
"#;

#[test]
fn factorial_program_is_accepted() {
    let program = parse(FACTORIAL).unwrap();
    assert_eq!(program.statements.len(), 2);
    analyze(&program).unwrap();
}

#[test]
fn function_params_keep_declared_order() {
    let program = parse("func f(string a, number b, number c) { }").unwrap();
    let Stmt::Function(func) = &program.statements[0] else {
        panic!("expected a function");
    };
    let params: Vec<_> = func.params.iter().map(|p| (p.ty, p.name.as_str())).collect();
    assert_eq!(
        params,
        [
            (TypeName::String, "a"),
            (TypeName::Number, "b"),
            (TypeName::Number, "c")
        ]
    );
}

#[test]
fn parse_error_reports_position_of_offending_token() {
    let err = parse("func main() {\n  print(1)\n}").unwrap_err();
    assert_eq!(
        err,
        ParseError::Unexpected {
            pos: Pos::new(3, 1),
            expected: "';' after print",
            found: "'}'".to_string(),
        }
    );
}

#[test]
fn semantic_error_reports_position() {
    let program = parse("func main() {\n  number a = 1;\n  print(b);\n}").unwrap();
    let err = analyze(&program).unwrap_err();
    assert_eq!(
        err,
        SemanticError::UndeclaredVariable {
            pos: Pos::new(3, 9),
            name: "b".to_string(),
        }
    );
    assert_eq!(err.to_string(), "3:9: use of undeclared variable 'b'");
}

#[test]
fn mutual_recursion_is_accepted() {
    let source = r#"
        func even(number n) { if n == 0 { return 1; } return odd(n - 1); }
        func odd(number n) { if n == 0 { return 0; } return even(n - 1); }
        func main() { print(even(10)); }
    "#;
    analyze(&parse(source).unwrap()).unwrap();
}

#[test]
fn comments_are_ignored() {
    let source = "// header\nfunc main() { // entry\n print(1); }\n";
    analyze(&parse(source).unwrap()).unwrap();
}
