#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a choice family: a plain Rust enum plus its [`Choice`] table.
///
/// A member without an explicit pattern matches its lowercased identifier.
///
/// [`Choice`]: crate::descriptor::Choice
#[macro_export]
macro_rules! choice {
    (@pattern) => {
        None
    };
    (@pattern $pattern:literal) => {
        Some($pattern)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $family:literal {
            $( $(#[$member_meta:meta])* $member:ident $(=> $pattern:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$member_meta])* $member ),*
        }

        impl $crate::descriptor::Choice for $name {
            const FAMILY: &'static str = $family;
            const MEMBERS: &'static [$crate::descriptor::Member<Self>] = &[
                $(
                    $crate::descriptor::Member {
                        value: $name::$member,
                        name: stringify!($member),
                        pattern: $crate::choice!(@pattern $($pattern)?),
                    }
                ),*
            ];
        }
    };
}

/// Declare one variant: its kind, template, fields and optional hydration
/// override.
#[macro_export]
macro_rules! variant {
    (@hydrate) => {
        None
    };
    (@hydrate $hydrate:expr) => {
        Some($hydrate as $crate::descriptor::HydrateFn)
    };
    (
        kind: $kind:expr,
        template: $template:expr
        $(, fields: [ $($field:expr),* $(,)? ])?
        $(, hydrate: $hydrate:expr)?
        $(,)?
    ) => {{
        $crate::descriptor::VariantDescriptor {
            kind: $kind,
            template: $template,
            fields: vec![ $($($field),*)? ],
            hydrate: $crate::variant!(@hydrate $($hydrate)?),
        }
    }};
}
