//! Filter operators offered per column variant

use crate::domain::filter::FilterOperator;

use super::annotation::ColumnVariant;

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::DoesNotContain,
    FilterOperator::Is,
    FilterOperator::IsNot,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const OPTIONS_OPERATORS: &[FilterOperator] = &[
    FilterOperator::HasAnyOf,
    FilterOperator::HasNoneOf,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterEqual,
    FilterOperator::LessEqual,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::IsOn,
    FilterOperator::IsBefore,
    FilterOperator::IsAfter,
    FilterOperator::IsBetween,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const DEFAULT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::Is,
    FilterOperator::IsEmpty,
];

/// Operators the filter editor offers for a column variant
pub fn operators_for(variant: ColumnVariant) -> &'static [FilterOperator] {
    match variant {
        ColumnVariant::Text => TEXT_OPERATORS,
        ColumnVariant::Select | ColumnVariant::MultiSelect => OPTIONS_OPERATORS,
        ColumnVariant::Number => NUMBER_OPERATORS,
        ColumnVariant::Date => DATE_OPERATORS,
        ColumnVariant::Boolean => DEFAULT_OPERATORS,
    }
}
