//! Human-readable reports for the probe binaries.

use std::io::{self, Write};

use crate::config::ProbeConfig;
use crate::connectivity::{ConnectivityOutcome, EndpointCheckResult, RootCheck};
use crate::cors::{CorsCheckResult, CorsReport, CorsVerdict};

const RULE: &str = "==================================================";

fn mark(ok: bool) -> &'static str {
    if ok { "[ok]  " } else { "[fail]" }
}

pub fn connectivity(
    out: &mut impl Write,
    outcome: &ConnectivityOutcome,
    config: &ProbeConfig,
) -> io::Result<()> {
    writeln!(out, "Backend connectivity check")?;
    writeln!(out, "{RULE}")?;

    let root = match outcome {
        ConnectivityOutcome::BaseUnreachable { url, error } => {
            writeln!(out, "{} API root {url}: {error}", mark(false))?;
            writeln!(out, "Basic connectivity failed. Make sure the server is running.")?;
            return Ok(());
        }
        ConnectivityOutcome::AuthenticationFailed { root, .. }
        | ConnectivityOutcome::Completed { root, .. } => root,
    };
    root_line(out, root)?;
    writeln!(out)?;

    match outcome {
        ConnectivityOutcome::BaseUnreachable { .. } => {}
        ConnectivityOutcome::AuthenticationFailed { failure, .. } => {
            for attempt in &failure.attempts {
                writeln!(
                    out,
                    "{} login as {} ({}): {}",
                    mark(false),
                    attempt.username,
                    attempt.label,
                    attempt.error.as_deref().unwrap_or("rejected")
                )?;
            }
            writeln!(
                out,
                "No login succeeded after {} attempt(s). Check the credentials.",
                failure.tried_count
            )?;
        }
        ConnectivityOutcome::Completed { auth, report, .. } => {
            for attempt in &auth.attempts {
                match &attempt.error {
                    Some(error) => writeln!(
                        out,
                        "{} login as {} ({}): {error}",
                        mark(false),
                        attempt.username,
                        attempt.label
                    )?,
                    None => writeln!(
                        out,
                        "{} login as {} ({}), token: {}",
                        mark(true),
                        attempt.username,
                        attempt.label,
                        auth.token_preview
                    )?,
                }
            }
            writeln!(out)?;

            for result in &report.results {
                endpoint_line(out, result)?;
            }
            writeln!(out)?;
            writeln!(out, "RESULTS:")?;
            writeln!(
                out,
                "Successful endpoints: {}/{}",
                report.success_count, report.total_count
            )?;
            if report.all_passed() {
                writeln!(out, "All checks passed. The backend is ready for the frontend.")?;
            } else {
                writeln!(out, "[warn] Some endpoints failed. Check the server logs.")?;
            }

            writeln!(out)?;
            writeln!(out, "URLs for the frontend:")?;
            writeln!(out, "  API root: {}", config.api_url("/"))?;
            writeln!(out, "  Login:    {}", config.api_url(&config.auth_login_path))?;
            writeln!(out, "  Docs:     {}", config.server_url(&config.docs_path))?;
        }
    }
    Ok(())
}

fn root_line(out: &mut impl Write, root: &RootCheck) -> io::Result<()> {
    write!(out, "{} API root {} ({})", mark(true), root.url, root.http_status)?;
    if let (Some(version), Some(state)) = (&root.version, &root.state) {
        write!(out, ", version {version}, state {state}")?;
    }
    writeln!(out)
}

fn endpoint_line(out: &mut impl Write, result: &EndpointCheckResult) -> io::Result<()> {
    if result.reachable {
        match result.item_count {
            Some(count) => writeln!(out, "{} {} accessible, {count} items", mark(true), result.path),
            None => writeln!(out, "{} {} accessible", mark(true), result.path),
        }
    } else {
        let status = result
            .http_status
            .map_or_else(|| "no response".to_string(), |s| s.to_string());
        writeln!(
            out,
            "{} {} failed ({status}): {}",
            mark(false),
            result.path,
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}

fn verdict_text(verdict: CorsVerdict) -> &'static str {
    match verdict {
        CorsVerdict::Ok => "[ok]   origin explicitly allowed",
        CorsVerdict::OpenWildcard => "[ok]   open to any origin (development setting)",
        CorsVerdict::Problem => "[warn] CORS may be misconfigured",
        CorsVerdict::Error => "[fail] request failed",
    }
}

pub fn cors(out: &mut impl Write, report: &CorsReport, config: &ProbeConfig) -> io::Result<()> {
    writeln!(out, "CORS check for browser frontends")?;
    writeln!(out, "{RULE}")?;

    for (index, result) in report.origins.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. Origin {}", index + 1, result.origin)?;
        origin_block(out, result)?;
    }

    writeln!(out)?;
    writeln!(out, "Reachability:")?;
    for probe in &report.reachability {
        match (probe.http_status, &probe.error) {
            (Some(status), _) => writeln!(out, "  {} {}: {status}", probe.label, probe.url)?,
            (None, Some(error)) => writeln!(out, "  {} {}: {error}", probe.label, probe.url)?,
            (None, None) => writeln!(out, "  {} {}: no response", probe.label, probe.url)?,
        }
    }

    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "SUMMARY:")?;
    writeln!(out, "- Access-Control-Allow-Origin echoing your origin is correct")?;
    writeln!(out, "- Status 200 or 405 (method not allowed) on the login route is fine")?;
    writeln!(out, "- Connection errors mean the server is not running")?;
    writeln!(out)?;
    writeln!(out, "URLs for the frontend:")?;
    writeln!(out, "  Login:    {}", config.server_url(&config.cors_login_path))?;
    writeln!(out, "  API base: {}", config.api_url("/"))?;
    Ok(())
}

fn origin_block(out: &mut impl Write, result: &CorsCheckResult) -> io::Result<()> {
    let preflight = &result.preflight;
    match (preflight.http_status, &preflight.error) {
        (Some(status), _) => {
            writeln!(out, "   Preflight status: {status}")?;
            for (name, value) in &preflight.access_control_headers {
                writeln!(out, "   - {name}: {value}")?;
            }
            match preflight.verdict {
                CorsVerdict::Ok => writeln!(out, "   [ok]   preflight accepted")?,
                CorsVerdict::OpenWildcard => {
                    writeln!(out, "   [ok]   preflight open to any origin")?
                }
                _ if status == 200 => {
                    writeln!(out, "   [warn] preflight returned no allow-origin for this origin")?
                }
                _ => writeln!(out, "   [warn] preflight status {status}")?,
            }
        }
        (None, error) => writeln!(
            out,
            "   [fail] preflight: {}",
            error.as_deref().unwrap_or("no response")
        )?,
    }

    if let Some(status) = result.http_status {
        writeln!(out, "   POST status: {status}")?;
        writeln!(
            out,
            "   Access-Control-Allow-Origin: {}",
            result.allowed_origin_header.as_deref().unwrap_or("not found")
        )?;
    }
    writeln!(out, "   {}", verdict_text(result.verdict))?;
    if let Some(detail) = &result.detail {
        writeln!(out, "   {detail}")?;
    }
    if let Some(excerpt) = &result.response_excerpt {
        writeln!(out, "   Response: {excerpt}")?;
    }
    Ok(())
}
