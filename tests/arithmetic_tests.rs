use ctutor::runner::{run, RunOutcome};
use std::fs;
use std::path::Path;

fn run_demo(name: &str, stdin: &str) -> ctutor::RunResult {
    let path = Path::new("demos").join(name);
    let source = fs::read_to_string(&path).expect("Failed to read demo file");
    run(&source, stdin)
}

#[test]
fn test_calculator_demo() {
    let result = run_demo("calculator.c", "");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(
        result.stdout_text,
        "10 + 5 = 15\n10 - 5 = 5\n10 * 5 = 50\n10 / 5 = 2\n"
    );
}

#[test]
fn test_loops_demo() {
    let result = run_demo("loops.c", "");
    assert_eq!(
        result.stdout_text,
        "for循环输出1到5：\n1 2 3 4 5 \n\nwhile循环输出1到5：\n1 2 3 4 5 \n"
    );
}

#[test]
fn test_arithmetic_coercion() {
    let source = r#"
        int main() {
            char c = 'a';
            int i = 10;
            float f = 2.5;
            double d = 7;

            printf("Char + Int: %d\n", c + i);
            printf("Int - Char: %d\n", i - c);
            printf("Char as char: %c\n", c + 1);
            printf("Int * Float: %.2f\n", i * f);
            printf("Double / Int: %.3f\n", d / 2);
            printf("Int / Int: %d\n", 7 / 2);
            printf("Mod: %d %d\n", 7 % 3, -7 % 3);
            printf("Cast: %d %.1f\n", (int)f, (float)i);
            if (c == 97) {
                printf("Comparison Char == Int: OK\n");
            }
            return 0;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Completed);

    let output = result.stdout_text;
    assert!(output.contains("Char + Int: 107\n"));
    assert!(output.contains("Int - Char: -87\n"));
    assert!(output.contains("Char as char: b\n"));
    assert!(output.contains("Int * Float: 25.00\n"));
    assert!(output.contains("Double / Int: 3.500\n"));
    assert!(output.contains("Int / Int: 3\n"));
    assert!(output.contains("Mod: 1 -1\n"));
    assert!(output.contains("Cast: 2 10.0\n"));
    assert!(output.contains("Comparison Char == Int: OK\n"));
}

#[test]
fn test_int_truncation_on_assignment() {
    let source = r#"
        int main() {
            int x = 9.99;
            int y;
            y = -3.7;
            printf("%d %d\n", x, y);
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "9 -3\n");
}

#[test]
fn test_compound_assignment_and_increments() {
    let source = r#"
        int main() {
            int a = 5;
            a += 3;
            a *= 2;
            a -= 1;
            a /= 3;
            a %= 4;
            int b = a++;
            int c = ++a;
            printf("%d %d %d\n", a, b, c);
            return 0;
        }
    "#;

    // ((5 + 3) * 2 - 1) / 3 = 5, 5 % 4 = 1
    assert_eq!(run(source, "").stdout_text, "3 1 3\n");
}

#[test]
fn test_logic_and_ternary() {
    let source = r#"
        int main() {
            int x = 0;
            int y = 3;
            printf("%d %d %d\n", x && y, x || y, !x);
            printf("%s\n", y > 2 ? "big" : "small");
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "0 1 1\nbig\n");
}
