fn main() {
    #[cfg(feature = "gui")]
    slint_build::compile("ui/kiosk.slint").expect("Slint build failed");
}
