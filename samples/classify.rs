fn classify(n: i32) -> &'static str {
    match n {
        0 => "zero",
        1..=9 => "small",
        _ => "large",
    }
}

fn main() {
    for i in 0..3 {
        println!("{}: {}", i, classify(i));
    }
}
