/*
 * Responsibility
 * - public interface of the middleware modules (re-export)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
