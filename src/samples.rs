//! Built-in C programs for trying the interpreter out

/// A named sample program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    /// Input to feed `scanf`
    pub stdin: &'static str,
}

const SAMPLES: [Sample; 7] = [
    Sample {
        name: "hello",
        title: "Hello World",
        source: include_str!("../demos/hello.c"),
        stdin: "",
    },
    Sample {
        name: "fibonacci",
        title: "斐波那契数列",
        source: include_str!("../demos/fibonacci.c"),
        stdin: "",
    },
    Sample {
        name: "input",
        title: "用户输入示例",
        source: include_str!("../demos/input.c"),
        stdin: "42, 9.5",
    },
    Sample {
        name: "calculator",
        title: "简单计算器",
        source: include_str!("../demos/calculator.c"),
        stdin: "",
    },
    Sample {
        name: "loops",
        title: "循环示例",
        source: include_str!("../demos/loops.c"),
        stdin: "",
    },
    Sample {
        name: "loop-test",
        title: "循环控制测试",
        source: include_str!("../demos/loop-test.c"),
        stdin: "",
    },
    Sample {
        name: "guess",
        title: "猜数字游戏",
        source: include_str!("../demos/guess.c"),
        stdin: "50",
    },
];

pub fn all() -> &'static [Sample] {
    &SAMPLES
}

pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name == name)
}

/// The sample shown when nothing else was asked for
pub fn default_sample() -> &'static Sample {
    &SAMPLES[0]
}
