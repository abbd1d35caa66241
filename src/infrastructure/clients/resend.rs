use async_trait::async_trait;
use serde::Serialize;

use crate::domain::templates::escape_html;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::EmailConfig;

const APP_NAME: &str = "TailoredAIResume";

/// Transactional mail the backend sends
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_verification(
        &self,
        to: &str,
        token: &str,
        full_name: Option<&str>,
    ) -> AppResult<()>;

    async fn send_welcome(&self, to: &str, name: &str) -> AppResult<()>;

    async fn send_subscription_confirmation(&self, to: &str, plan_name: &str) -> AppResult<()>;
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Resend REST client. Without an API key every send is skipped.
pub struct ResendEmailClient {
    api_key: Option<String>,
    api_url: String,
    from: String,
    frontend_url: String,
    http_client: reqwest::Client,
}

impl ResendEmailClient {
    pub fn new(config: &EmailConfig, frontend_url: String) -> Self {
        Self {
            api_key: config.resend_api_key.clone(),
            api_url: config.resend_api_url.trim_end_matches('/').to_string(),
            from: config.from.clone(),
            frontend_url,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(to = %to, subject = %subject, "Resend API key not configured, skipping email");
            return Ok(());
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: [to],
                subject,
                html,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Email delivery failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalService(format!(
                "Email delivery failed ({}): {}",
                status, error_text
            )));
        }

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1.0"></head>
<body style="margin:0;padding:40px 20px;font-family:-apple-system,BlinkMacSystemFont,sans-serif;background-color:#f8fafc;">
  <div style="max-width:500px;margin:0 auto;background:white;border-radius:16px;padding:40px;">
    <h1 style="margin:0 0 24px;font-size:24px;color:#1f2937;text-align:center;">{app}</h1>
    <h2 style="font-size:20px;color:#1f2937;margin-bottom:16px;">{heading}</h2>
    {body}
  </div>
</body>
</html>"#,
        app = APP_NAME,
        heading = heading,
        body = body,
    )
}

fn button(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" style="display:inline-block;padding:14px 32px;background:#6366F1;color:white;text-decoration:none;border-radius:10px;font-weight:600;">{}</a>"#,
        escape_html(href),
        label
    )
}

#[async_trait]
impl EmailSender for ResendEmailClient {
    async fn send_verification(
        &self,
        to: &str,
        token: &str,
        full_name: Option<&str>,
    ) -> AppResult<()> {
        let verify_url = format!(
            "{}/verify-email?token={}",
            self.frontend_url,
            urlencoding::encode(token)
        );
        let greeting = match full_name.filter(|n| !n.trim().is_empty()) {
            Some(name) => format!("Hi {},", escape_html(name)),
            None => "Hi,".to_string(),
        };
        let body = format!(
            r#"<p style="color:#6b7280;font-size:16px;line-height:1.6;">{}<br><br>Thanks for signing up! Please click the button below to verify your email address.</p>
    {}
    <p style="color:#9ca3af;font-size:14px;margin-top:24px;">This link expires in 24 hours.</p>
    <p style="color:#9ca3af;font-size:12px;text-align:center;">If you didn't create this account, ignore this email.</p>"#,
            greeting,
            button(&verify_url, "Verify Email")
        );

        self.send(
            to,
            &format!("Verify your {} account", APP_NAME),
            &layout("Verify your email address", &body),
        )
        .await
    }

    async fn send_welcome(&self, to: &str, name: &str) -> AppResult<()> {
        let body = format!(
            r#"<p style="color:#6b7280;font-size:16px;line-height:1.6;">Hi {},<br><br>Your account is ready. Build your master profile once, then tailor it to every job you apply for.</p>
    {}"#,
            escape_html(name),
            button(&format!("{}/dashboard", self.frontend_url), "Go to Dashboard")
        );

        self.send(
            to,
            &format!("Welcome to {}!", APP_NAME),
            &layout("Welcome aboard", &body),
        )
        .await
    }

    async fn send_subscription_confirmation(&self, to: &str, plan_name: &str) -> AppResult<()> {
        let plan = escape_html(plan_name);
        let body = format!(
            r#"<p style="color:#6b7280;font-size:16px;line-height:1.6;">Your <strong>{}</strong> subscription is now active and your monthly generations have been refreshed.</p>
    {}"#,
            plan,
            button(&format!("{}/billing", self.frontend_url), "Manage Billing")
        );

        self.send(
            to,
            &format!("Your {} subscription is active!", plan_name),
            &layout("Subscription confirmed", &body),
        )
        .await
    }
}
