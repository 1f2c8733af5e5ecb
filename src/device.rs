use crate::error::TransportError;

/// Something that delivers complete raw reports, one per read.
///
/// Implemented by transport backends (hidapi, scripted test sources).
pub trait ReportSource {
    /// Hook called once before the first read, e.g. to switch the device into
    /// gamepad mode.
    fn prepare(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Hook called before every read when the driver is configured to
    /// re-assert device mode. Failures are ignored by the driver.
    fn before_read(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Read one report into `buf`, waiting at most `timeout_ms`.
    ///
    /// `Ok(0)` means no data arrived this cycle; it is not an error.
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;

    fn name(&self) -> &str;
}

impl<S: ReportSource + ?Sized> ReportSource for Box<S> {
    fn prepare(&mut self) -> Result<(), TransportError> {
        (**self).prepare()
    }

    fn before_read(&mut self) -> Result<(), TransportError> {
        (**self).before_read()
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        (**self).read_report(buf, timeout_ms)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
