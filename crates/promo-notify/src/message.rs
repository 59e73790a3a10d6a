//! Customer-facing notification texts

use promo_core::AccessKind;

/// Telegram message sent to the buyer after a confirmed payment.
/// The wording matches what the storefront promises during checkout.
pub fn payment_confirmed_message(kind: AccessKind, code: &str, provider: &str) -> String {
    let header = match provider {
        "yoomoney" => "🔥 ОПЛАТА ЧЕРЕЗ ЮMONEY ПОДТВЕРЖДЕНА!",
        _ => "🔥 ОПЛАТА ПОДТВЕРЖДЕНА!",
    };
    format!(
        "{header}\n\nУслуга: {service}\nВаш персональный код доступа:\n\n{code}\n\nВведите его в приложении «Обережье», чтобы активировать доступ.",
        header = header,
        service = kind.service_name(),
        code = code,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_contains_code_and_service() {
        let msg = payment_confirmed_message(AccessKind::Sketch, "RUNE-AB2C-XY7Z", "cloudtips");
        assert!(msg.contains("RUNE-AB2C-XY7Z"));
        assert!(msg.contains("Генератор Эскизов"));
        assert!(!msg.contains("ЮMONEY"));
    }

    #[test]
    fn test_yoomoney_header() {
        let msg =
            payment_confirmed_message(AccessKind::MasterSpread, "RUNE-AB2C-XY7Z", "yoomoney");
        assert!(msg.contains("ЮMONEY"));
        assert!(msg.contains("Мастерский Расклад"));
    }
}
