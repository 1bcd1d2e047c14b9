//! Sample SOPs and tickets for the demo binary and integration tests.
//!
//! Two tenants with disjoint documents, so tenant isolation is visible in
//! the demo output.

use opsdesk_common::{Priority, SopDocument, Ticket};
use serde_json::json;

pub const TENANT_ACME: &str = "acme-corp";
pub const TENANT_GLOBEX: &str = "globex-it";

pub fn sample_sops() -> Vec<SopDocument> {
    vec![
        SopDocument {
            tenant_id: TENANT_ACME.to_string(),
            title: "Password Reset Procedure".to_string(),
            category: "password_reset".to_string(),
            tags: vec!["authentication".to_string(), "security".to_string()],
            metadata: json!({"identity_provider": "Azure AD"}),
            content: "\
Purpose: reset user passwords for employees who are locked out of their accounts.

Step 1: Identity Verification. Contact the user through their registered email or phone number and confirm full name, employee ID and department. Never reset a password without verification.

Step 2: Check Account Status. Log into the identity provider console and verify the account exists, is active, and is not locked for security violations.

Step 3: Generate Temporary Password. Use the password generation tool to create a secure temporary password of at least 12 characters.

Step 4: Reset Password. In the identity management console select Reset Password, enter the temporary password, and require a change at next login.

Step 5: Communicate the temporary password over a secure channel. Never send passwords via unencrypted email.

Step 6: Verify the user can log in and has changed the password."
                .to_string(),
        },
        SopDocument {
            tenant_id: TENANT_ACME.to_string(),
            title: "Server Restart Procedure".to_string(),
            category: "system_restart".to_string(),
            tags: vec!["infrastructure".to_string()],
            metadata: json!({"rmm": "NinjaOne"}),
            content: "\
Purpose: safely restart a frozen or unresponsive server.

Step 1: Check system status, running processes and open user sessions before any restart.

Step 2: Notify affected users of the pending restart with at least ten minutes warning.

Step 3: Save system state and export recent logs for later diagnosis.

Step 4: Initiate the restart through the RMM console. Restarts of production servers require prior approval.

Step 5: Verify the server comes back online and all services start correctly."
                .to_string(),
        },
        SopDocument {
            tenant_id: TENANT_ACME.to_string(),
            title: "VPN Access Setup".to_string(),
            category: "vpn_access".to_string(),
            tags: vec!["network".to_string(), "remote".to_string()],
            metadata: json!({"vpn": "WireGuard"}),
            content: "\
Purpose: provision VPN access for remote work.

Step 1: Validate the request has manager approval on file.

Step 2: Verify the device meets security compliance: disk encryption, endpoint protection, supported OS version.

Step 3: Create the VPN user profile. New profiles require approval from the security team.

Step 4: Configure multi-factor authentication before first connection.

Step 5: Deploy the VPN client to the user device and test the connection together with the user."
                .to_string(),
        },
        SopDocument {
            tenant_id: TENANT_GLOBEX.to_string(),
            title: "Backup Verification Checklist".to_string(),
            category: "backup_verification".to_string(),
            tags: vec!["backup".to_string()],
            metadata: json!({"backup_tool": "Veeam"}),
            content: "\
Purpose: verify nightly backup jobs completed and data is restorable.

Step 1: Access the backup management console and review the last 24 hours of jobs.

Step 2: Verify backup integrity and reported file sizes against expectations.

Step 3: Perform a test restore of a sample file set when any job looks suspicious. Test restores into production paths require approval.

Step 4: Document the verification results in the operations log."
                .to_string(),
        },
    ]
}

pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        Ticket {
            id: "TCK-1001".to_string(),
            tenant_id: TENANT_ACME.to_string(),
            subject: "Cannot log into my account".to_string(),
            description: "forgot my password".to_string(),
            priority: Priority::High,
            requester_email: Some("jdoe@acme-corp.example".to_string()),
        },
        Ticket {
            id: "TCK-1002".to_string(),
            tenant_id: TENANT_ACME.to_string(),
            subject: "File server frozen".to_string(),
            description: "The file server is not responding, please restart it".to_string(),
            priority: Priority::Critical,
            requester_email: None,
        },
        Ticket {
            id: "TCK-1003".to_string(),
            tenant_id: TENANT_GLOBEX.to_string(),
            subject: "Backup failed last night".to_string(),
            description: "The nightly backup job reported a failure, please verify and restore if needed".to_string(),
            priority: Priority::High,
            requester_email: None,
        },
        Ticket {
            id: "TCK-1004".to_string(),
            tenant_id: TENANT_GLOBEX.to_string(),
            subject: "asdkjaslkdj".to_string(),
            description: String::new(),
            priority: Priority::Low,
            requester_email: None,
        },
    ]
}
