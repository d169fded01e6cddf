fn main() {
    rustducker::runtime::native::start();
}
