/// Builder-style setters for request structs.
///
/// - `setter!(field: Ty)` sets a plain field
/// - `setter!(opt field: Ty)` sets an `Option<Ty>` field
/// - `setter!(list field: Item)` fills a `Vec<Item>` from any iterator
/// - `setter!(opt list field: Item)` does the same for `Option<Vec<Item>>`
macro_rules! setter {
    ($field:ident : $ty:ty) => {
        pub fn $field<T>(mut self, $field: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field = $field.into();
            self
        }
    };

    (opt $field:ident : $ty:ty) => {
        pub fn $field<T>(mut self, $field: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field = std::option::Option::Some($field.into());
            self
        }
    };

    (list $field:ident : $item:ty) => {
        pub fn $field<I>(mut self, $field: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<$item>,
        {
            self.$field = $field.into_iter().map(Into::into).collect();
            self
        }
    };

    (opt list $field:ident : $item:ty) => {
        pub fn $field<I>(mut self, $field: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<$item>,
        {
            self.$field = std::option::Option::Some($field.into_iter().map(Into::into).collect());
            self
        }
    };
}

pub(crate) use setter;
