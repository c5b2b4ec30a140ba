use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Writer shared by the renderer, the audio port and the command loop so
/// their lines interleave in the order they were produced.
#[derive(Clone)]
pub struct SharedOutput {
    inner: Rc<RefCell<Box<dyn Write>>>,
}

impl SharedOutput {
    pub fn new(writer: impl Write + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.borrow_mut().flush()
    }
}
