//! Backend commands queued from UI to backend worker.

use intake_core::{SubmissionTicket, UploadRequest};

pub enum BackendCommand {
    Upload {
        ticket: SubmissionTicket,
        request: UploadRequest,
    },
    CheckHealth,
}
