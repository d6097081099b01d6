/// Format an amount of rupees with Indian digit grouping, e.g. `₹1,25,000`.
///
/// The last three digits form one group and every group above it holds two digits.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts() {
        assert_eq!(format_inr(0), "₹0");
        assert_eq!(format_inr(999), "₹999");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(format_inr(1_000), "₹1,000");
        assert_eq!(format_inr(25_000), "₹25,000");
        assert_eq!(format_inr(75_000), "₹75,000");
    }

    #[test]
    fn test_lakhs_and_crores() {
        assert_eq!(format_inr(100_000), "₹1,00,000");
        assert_eq!(format_inr(1_250_000), "₹12,50,000");
        assert_eq!(format_inr(25_000_000), "₹2,50,00,000");
    }
}
