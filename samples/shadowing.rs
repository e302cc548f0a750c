fn scale(x: i32) -> i32 {
    let x = x * 2;
    let x = x + 1;
    x
}
