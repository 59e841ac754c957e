/// Runs `f` to completion on a scoped worker thread and hands back its
/// result. Blocking clients such as `reqwest::blocking` refuse to run on
/// the UI runtime's own threads.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    std::thread::scope(|scope| match scope.spawn(f).join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    })
}
