// Integration tests for the C interpreter

use ctutor::interpreter::DiagnosticKind;
use ctutor::runner::{run, run_with_config, AbortReason, RunConfig, RunOutcome};

#[test]
fn test_simple_arithmetic() {
    let source = r#"
        int main() {
            int x = 5;
            int y = 10;
            int z = x + y;
            return z;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.exit_code, Some(15));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_function_call() {
    let source = r#"
        int add(int a, int b) {
            return a + b;
        }

        int main() {
            int result = add(3, 4);
            printf("%d\n", result);
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "7\n");
}

#[test]
fn test_printf_decimal() {
    let source = r#"
        int main() {
            int n = -42;
            printf("n = %d!\n", n);
            return 0;
        }
    "#;
    assert_eq!(run(source, "").stdout_text, "n = -42!\n");
}

#[test]
fn test_printf_percent_literal() {
    let result = run("int main() { printf(\"A%%B\"); return 0; }", "");
    assert_eq!(result.stdout_text, "A%B");
}

#[test]
fn test_integer_division_truncates() {
    let source = r#"
        int main() {
            printf("%d %d\n", 5 / 2, -7 / 2);
            return 0;
        }
    "#;
    assert_eq!(run(source, "").stdout_text, "2 -3\n");
}

#[test]
fn test_division_by_zero_continues() {
    let source = r#"
        int main() {
            int x = 10;
            int y = x / 0;
            printf("y = %d\n", y);
            return 0;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert!(result.stdout_text.ends_with("y = 0\n"));
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Runtime);
    assert_eq!(result.diagnostics[0].line, Some(4));
    assert!(result.diagnostics[0].message.contains("除数为零"));
}

#[test]
fn test_for_loop_output() {
    let source = r#"
        int main() {
            int i;
            for (i = 0; i < 5; i++) printf("%d ", i);
            return 0;
        }
    "#;
    assert_eq!(run(source, "").stdout_text, "0 1 2 3 4 ");
}

#[test]
fn test_infinite_loop_stops_at_ceiling() {
    let config = RunConfig {
        max_loop_iterations: 5,
        ..RunConfig::default()
    };
    let source = r#"
        int main() {
            while (1) {
                printf("x");
            }
            return 0;
        }
    "#;

    let result = run_with_config(source, "", &config);
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::ResourceLimit));
    assert_eq!(
        result.stdout_text,
        "xxxxx\n错误: 可能存在无限循环: 循环次数超过 5 次, 程序已终止\n"
    );
    assert_eq!(result.exit_code, None);
}

#[test]
fn test_default_ceiling_is_ten_thousand() {
    let source = r#"
        int count = 0;
        int main() {
            while (1) {
                count++;
            }
            return 0;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::ResourceLimit));
    assert!(result.stdout_text.contains("循环次数超过 10000 次"));
}

#[test]
fn test_step_budget() {
    let config = RunConfig {
        max_steps: 100,
        ..RunConfig::default()
    };
    let source = r#"
        int main() {
            int i;
            for (i = 0; i < 1000; i++) {
                printf("");
            }
            return 0;
        }
    "#;

    let result = run_with_config(source, "", &config);
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::ResourceLimit));
    assert!(result.stdout_text.contains("执行步数超过 100 步"));
}

#[test]
fn test_runaway_recursion() {
    let source = r#"
        int down(int n) {
            return down(n + 1);
        }

        int main() {
            down(0);
            return 0;
        }
    "#;

    let config = RunConfig {
        max_call_depth: 40,
        ..RunConfig::default()
    };
    let result = run_with_config(source, "", &config);
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::ResourceLimit));
    assert!(result.stdout_text.contains("调用深度超过 40 层"));
}

fn on_small_stack<T: Send + 'static>(body: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(body)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_default_depth_ceiling_on_small_stack() {
    let source = r#"
        int down(int n) {
            if (n >= 0) {
                while (1) {
                    for (int i = 0; i < 1; i++) {
                        switch (n % 2) {
                            case 0:
                                return down(n + 1);
                            default:
                                return down(n + 1) + 1;
                        }
                    }
                }
            }
            return 0;
        }

        int main() {
            printf("start\n");
            down(0);
            return 0;
        }
    "#;

    let result = on_small_stack(move || run(source, ""));
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::ResourceLimit));
    assert!(result.stdout_text.starts_with("start\n"));
    assert!(result.stdout_text.contains("调用深度超过 200 层"));
}

#[test]
fn test_deep_recursion_below_ceiling_on_small_stack() {
    let source = r#"
        int down(int n) {
            if (n == 0) return 0;
            return down(n - 1) + 1;
        }

        int main() {
            printf("%d\n", down(195));
            return 0;
        }
    "#;

    let result = on_small_stack(move || run(source, ""));
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.stdout_text, "195\n");
}

#[test]
fn test_scanf_with_input() {
    let source = r#"
        int main() {
            int a, b;
            scanf("%d %d", &a, &b);
            printf("%d + %d = %d\n", a, b, a + b);
            return 0;
        }
    "#;

    assert_eq!(run(source, "3,4").stdout_text, "[输入]: 3, 4\n3 + 4 = 7\n");
    assert_eq!(run(source, "").stdout_text, "[输入]: 0, 0\n0 + 0 = 0\n");
}

#[test]
fn test_scanf_mixed_types() {
    let source = r#"
        int main() {
            int age;
            float height;
            char name[20];
            scanf("%d %f %s", &age, &height, name);
            printf("%s: %d, %.1f\n", name, age, height);
            return 0;
        }
    "#;

    let result = run(source, "20 1.75 mars");
    assert!(result.stdout_text.ends_with("mars: 20, 1.8\n"));
}

#[test]
fn test_recursive_fibonacci() {
    let source = r#"
        int fib(int n) {
            if (n <= 1) {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }

        int main() {
            printf("%d\n", fib(10));
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "55\n");
}

#[test]
fn test_runs_are_deterministic() {
    let source = r#"
        int main() {
            int i;
            for (i = 0; i < 3; i++) {
                printf("%d\n", rand() % 100);
            }
            return 0;
        }
    "#;

    let first = run(source, "");
    let second = run(source, "");
    assert_eq!(first.stdout_text, second.stdout_text);
    assert_eq!(first.estimated_memory_bytes, second.estimated_memory_bytes);
}

#[test]
fn test_syntax_errors_prevent_execution() {
    let source = r#"
        int main() {
            printf("never\n");
            return 0;
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::Syntax));
    assert!(result.stdout_text.is_empty());
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::Syntax || d.kind == DiagnosticKind::Warning));
}

#[test]
fn test_missing_main() {
    let result = run("int helper() { return 1; }", "");
    assert_eq!(result.outcome, RunOutcome::Aborted(AbortReason::Syntax));
    assert!(result.report().contains("缺少int main()函数声明"));
}

#[test]
fn test_unknown_statement_is_skipped() {
    let source = r#"
        int main() {
            int x = 1;
            x @ 3;
            printf("%d\n", x);
            return 0;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert!(result.stdout_text.ends_with("1\n"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::Warning && d.line == Some(4)));
}

#[test]
fn test_oversized_literal_skips_only_its_statement() {
    let source = r#"
        int main() {
            int x = 1;
            int big = 99999999999999999999;
            printf("%d\n", x);
            return 0;
        }
    "#;

    let result = run(source, "");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert!(result.stdout_text.ends_with("1\n"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::Warning && d.line == Some(4)));
}

#[test]
fn test_switch_with_fallthrough() {
    let source = r#"
        int main() {
            int day = 2;
            switch (day) {
                case 1:
                    printf("one ");
                case 2:
                    printf("two ");
                case 3:
                    printf("three ");
                    break;
                default:
                    printf("other ");
            }
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "two three ");
}

#[test]
fn test_nested_loops_with_break_and_continue() {
    let source = r#"
        int main() {
            int i, j;
            for (i = 0; i < 3; i++) {
                for (j = 0; j < 3; j++) {
                    if (j == 1) continue;
                    if (j == 2) break;
                    printf("%d%d ", i, j);
                }
            }
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "00 10 20 ");
}

#[test]
fn test_do_while_runs_once() {
    let source = r#"
        int main() {
            int n = 10;
            do {
                printf("%d", n);
                n++;
            } while (n < 5);
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "10");
}

#[test]
fn test_globals_and_scopes() {
    let source = r#"
        int counter = 0;

        void bump() {
            counter = counter + 1;
        }

        int main() {
            int x = 1;
            {
                int x = 2;
                printf("%d ", x);
            }
            bump();
            bump();
            printf("%d %d\n", x, counter);
            return 0;
        }
    "#;

    assert_eq!(run(source, "").stdout_text, "2 1 2\n");
}

#[test]
fn test_report_trailer() {
    let result = run("int main() { printf(\"ok\\n\"); return 0; }", "");
    let report = result.report();
    assert!(report.starts_with("ok\n\n编译成功！\n运行时间: "));
    assert!(report.contains("秒\n内存使用: "));
    assert!(report.ends_with("MB"));
}
