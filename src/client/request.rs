/*!
 * Request Construction
 * Sandbox descriptor -> plugin request
 */

use crate::context::CallContext;
use crate::proto::{AttachInterfaceRequest, DetachInterfaceRequest};
use crate::sandbox::SandboxInfo;
use tonic::Request;

pub fn attach_request<S: SandboxInfo + ?Sized>(sandbox: &S) -> AttachInterfaceRequest {
    AttachInterfaceRequest {
        labels: sandbox.labels().clone(),
        annotations: sandbox.annotations().clone(),
        name: sandbox.name().to_string(),
        id: sandbox.id().to_string(),
        namespace: sandbox.namespace().to_string(),
        netns_path: sandbox.netns_path(),
    }
}

pub fn detach_request<S: SandboxInfo + ?Sized>(sandbox: &S) -> DetachInterfaceRequest {
    DetachInterfaceRequest {
        labels: sandbox.labels().clone(),
        annotations: sandbox.annotations().clone(),
        name: sandbox.name().to_string(),
        id: sandbox.id().to_string(),
        namespace: sandbox.namespace().to_string(),
        netns_path: sandbox.netns_path(),
    }
}

/// Wrap a message, forwarding the context deadline as `grpc-timeout`
pub(crate) fn with_context<T>(ctx: &CallContext, message: T) -> Request<T> {
    let mut request = Request::new(message);
    if let Some(remaining) = ctx.remaining() {
        request.set_timeout(remaining);
    }
    request
}
