//! Integrations and audit history.

use crate::client::Client;
use crate::types::{
    AuditLogEntry, OAuth2Client, OAuth2ClientCreationRequestInput, OAuth2ClientCreationResponse,
    Webhook, WebhookCreationRequestInput, WebhookTriggerEvent,
    WebhookTriggerEventCreationRequestInput,
};

impl Client {
    bindings! {
        one CreateWebhook => create_webhook(; WebhookCreationRequestInput) -> Webhook
            = POST ["/api/v1/webhooks"];
        one GetWebhook => get_webhook(webhook_id) -> Webhook
            = GET ["/api/v1/webhooks" {webhook_id: "webhook"}];
        page GetWebhooks => get_webhooks() -> Webhook
            = GET ["/api/v1/webhooks"];
        unit ArchiveWebhook => archive_webhook(webhook_id)
            = DELETE ["/api/v1/webhooks" {webhook_id: "webhook"}];
        /// Subscribe the webhook to one more event type
        one AddWebhookTriggerEvent => add_webhook_trigger_event(webhook_id; WebhookTriggerEventCreationRequestInput) -> WebhookTriggerEvent
            = POST ["/api/v1/webhooks" {webhook_id: "webhook"} "trigger_events"];
        unit ArchiveWebhookTriggerEvent => archive_webhook_trigger_event(webhook_id, webhook_trigger_event_id)
            = DELETE ["/api/v1/webhooks" {webhook_id: "webhook"} "trigger_events" {webhook_trigger_event_id: "webhookTriggerEvent"}];

        /// Register a client; the response is the only place its secret appears
        one CreateOAuth2Client => create_oauth2_client(; OAuth2ClientCreationRequestInput) -> OAuth2ClientCreationResponse
            = POST ["/api/v1/oauth2_clients"];
        one GetOAuth2Client => get_oauth2_client(oauth2_client_id) -> OAuth2Client
            = GET ["/api/v1/oauth2_clients" {oauth2_client_id: "oauth2Client"}];
        page GetOAuth2Clients => get_oauth2_clients() -> OAuth2Client
            = GET ["/api/v1/oauth2_clients"];
        unit ArchiveOAuth2Client => archive_oauth2_client(oauth2_client_id)
            = DELETE ["/api/v1/oauth2_clients" {oauth2_client_id: "oauth2Client"}];

        one GetAuditLogEntry => get_audit_log_entry(audit_log_entry_id) -> AuditLogEntry
            = GET ["/api/v1/audit_log_entries" {audit_log_entry_id: "auditLogEntry"}];
        page GetAuditLogEntriesForUser => get_audit_log_entries_for_user() -> AuditLogEntry
            = GET ["/api/v1/audit_log_entries/for_user"];
        page GetAuditLogEntriesForHousehold => get_audit_log_entries_for_household() -> AuditLogEntry
            = GET ["/api/v1/audit_log_entries/for_household"];
    }
}
