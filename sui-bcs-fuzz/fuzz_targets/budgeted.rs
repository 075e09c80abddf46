#![no_main]

use libfuzzer_sys::fuzz_target;
use sui_bcs::{
    DecoderConfig, Deserializable, TrailingBytes,
    sui::ProgrammableTransaction,
    value::{FieldLayout, TypeLayout, Value, VariantLayout},
};

fuzz_target!(|data: &[u8]| {
    // a budget equal to the input size is never the reason a valid input fails
    let budget = data.len();
    let exact = ProgrammableTransaction::read_from_bytes(data);
    let budgeted = ProgrammableTransaction::read_from_bytes_with_budget(data, budget);
    if let Ok(transaction) = &exact {
        assert_eq!(budgeted.as_ref(), Ok(transaction));
    }

    // a smaller budget must fail cleanly instead of allocating for attacker-chosen lengths
    if !data.is_empty() {
        assert!(ProgrammableTransaction::read_from_bytes_with_budget(data, budget - 1).is_err());
    }

    let layout = TypeLayout::vector(TypeLayout::structure("Entry", vec![
        FieldLayout::new("key", TypeLayout::vector(TypeLayout::U8)),
        FieldLayout::new("value", TypeLayout::enumeration("Option", vec![
            VariantLayout { name: "None".into(), fields: Vec::new() },
            VariantLayout {
                name: "Some".into(),
                fields: vec![FieldLayout::new("value", TypeLayout::U64)],
            },
        ])),
    ]));
    let config = DecoderConfig::default()
        .with_trailing_bytes(TrailingBytes::Allow)
        .with_budget(budget / 2);
    let _ = Value::from_bytes_with_layout(data, &layout, &config);
});
