// Amounts are whole rupiah, the gateway takes no minor units for IDR.

pub fn format_idr(amount: u64) -> String {
    format!("IDR {},-", group_thousands(amount))
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
