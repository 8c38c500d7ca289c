//! Mail templates for decision notifications. Placeholders are written as
//! `{name}` and substituted verbatim; a placeholder with no supplied value
//! is left in place.

pub struct MailTemplate {
    pub subject: &'static str,
    pub body: &'static str,
}

impl MailTemplate {
    /// Substitute `{key}` placeholders in subject and body.
    pub fn render(&self, vars: &[(&str, &str)]) -> (String, String) {
        let mut subject = self.subject.to_string();
        let mut body = self.body.to_string();
        for (key, value) in vars {
            let marker = format!("{{{key}}}");
            subject = subject.replace(&marker, value);
            body = body.replace(&marker, value);
        }
        (subject, body)
    }
}

pub const SUBMISSION_APPROVED: MailTemplate = MailTemplate {
    subject: "Your submission {reference} has been approved",
    body: "Dear {name},\n\n\
        Your paper \"{title}\" ({reference}) has passed the submission check \
        and has been forwarded to the program committee for review.\n\n\
        Notes from the committee: {reason}\n\n\
        Confera Organizing Committee",
};

pub const SUBMISSION_REJECTED: MailTemplate = MailTemplate {
    subject: "Your submission {reference} was not accepted",
    body: "Dear {name},\n\n\
        We are sorry to inform you that your paper \"{title}\" ({reference}) \
        was not accepted for review.\n\n\
        Reason: {reason}\n\n\
        Confera Organizing Committee",
};

pub const PAYMENT_VERIFIED: MailTemplate = MailTemplate {
    subject: "Registration payment verified",
    body: "Dear {name},\n\n\
        Your registration payment of {amount} (transaction {transaction_id}) \
        has been verified. Your registration is confirmed.\n\n\
        Notes: {reason}\n\n\
        Confera Organizing Committee",
};

pub const PAYMENT_REJECTED: MailTemplate = MailTemplate {
    subject: "Registration payment could not be verified",
    body: "Dear {name},\n\n\
        Your registration payment of {amount} (transaction {transaction_id}) \
        could not be verified.\n\n\
        Reason: {reason}\n\n\
        Please upload a corrected proof of payment from your dashboard.\n\n\
        Confera Organizing Committee",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_substitute_in_subject_and_body() {
        let (subject, body) = SUBMISSION_APPROVED.render(&[
            ("name", "Ada Lovelace"),
            ("title", "On Analytical Engines"),
            ("reference", "PAP-20260801-1a2b3c4d"),
            ("reason", "looks good"),
        ]);
        assert_eq!(
            subject,
            "Your submission PAP-20260801-1a2b3c4d has been approved"
        );
        assert!(body.contains("Dear Ada Lovelace,"));
        assert!(body.contains("\"On Analytical Engines\""));
        assert!(body.contains("looks good"));
    }

    #[test]
    fn missing_values_leave_the_marker() {
        let (_, body) = PAYMENT_REJECTED.render(&[("name", "Ada")]);
        assert!(body.contains("{amount}"));
        assert!(body.contains("{reason}"));
    }

    #[test]
    fn payment_templates_carry_amount_and_transaction() {
        let (subject, body) = PAYMENT_VERIFIED.render(&[
            ("name", "Grace"),
            ("amount", "5500 INR"),
            ("transaction_id", "TXN-991"),
            ("reason", ""),
        ]);
        assert_eq!(subject, "Registration payment verified");
        assert!(body.contains("5500 INR"));
        assert!(body.contains("TXN-991"));
    }
}
