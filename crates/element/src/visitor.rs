//! Double dispatch over [`ElementValue`] variants.
//!
//! Serializers and other external passes implement [`ElementVisitor`] (or
//! [`ElementVisitorWithArg`] when they thread state such as a depth through
//! the walk). A visitor that returns nothing uses `Output = ()`.

use uuid::Uuid;

use crate::value::{ArrayValue, ElementValue, Number, ObjectValue};

pub trait ElementVisitor<'a> {
    type Output;

    fn visit_null(&mut self) -> Self::Output;

    fn visit_boolean(&mut self, value: bool) -> Self::Output;

    fn visit_number(&mut self, value: Number) -> Self::Output;

    fn visit_string(&mut self, value: &str) -> Self::Output;

    fn visit_guid(&mut self, value: Uuid) -> Self::Output;

    fn visit_binary(&mut self, value: &[u8]) -> Self::Output;

    fn visit_array(&mut self, value: &ArrayValue<'a>) -> Self::Output;

    fn visit_object(&mut self, value: &ObjectValue<'a>) -> Self::Output;
}

pub trait ElementVisitorWithArg<'a, A> {
    type Output;

    fn visit_null(&mut self, arg: A) -> Self::Output;

    fn visit_boolean(&mut self, value: bool, arg: A) -> Self::Output;

    fn visit_number(&mut self, value: Number, arg: A) -> Self::Output;

    fn visit_string(&mut self, value: &str, arg: A) -> Self::Output;

    fn visit_guid(&mut self, value: Uuid, arg: A) -> Self::Output;

    fn visit_binary(&mut self, value: &[u8], arg: A) -> Self::Output;

    fn visit_array(&mut self, value: &ArrayValue<'a>, arg: A) -> Self::Output;

    fn visit_object(&mut self, value: &ObjectValue<'a>, arg: A) -> Self::Output;
}

impl<'a> ElementValue<'a> {
    /// Calls the `visitor` method matching this value's variant.
    pub fn accept<V>(&self, visitor: &mut V) -> V::Output
    where
        V: ElementVisitor<'a> + ?Sized,
    {
        match self {
            ElementValue::Null => visitor.visit_null(),
            ElementValue::Boolean(v) => visitor.visit_boolean(*v),
            ElementValue::Number(v) => visitor.visit_number(*v),
            ElementValue::String(v) => visitor.visit_string(v),
            ElementValue::Guid(v) => visitor.visit_guid(*v),
            ElementValue::Binary(v) => visitor.visit_binary(v),
            ElementValue::Array(v) => visitor.visit_array(v),
            ElementValue::Object(v) => visitor.visit_object(v),
        }
    }

    pub fn accept_with<V, A>(&self, visitor: &mut V, arg: A) -> V::Output
    where
        V: ElementVisitorWithArg<'a, A> + ?Sized,
    {
        match self {
            ElementValue::Null => visitor.visit_null(arg),
            ElementValue::Boolean(v) => visitor.visit_boolean(*v, arg),
            ElementValue::Number(v) => visitor.visit_number(*v, arg),
            ElementValue::String(v) => visitor.visit_string(v, arg),
            ElementValue::Guid(v) => visitor.visit_guid(*v, arg),
            ElementValue::Binary(v) => visitor.visit_binary(v, arg),
            ElementValue::Array(v) => visitor.visit_array(v, arg),
            ElementValue::Object(v) => visitor.visit_object(v, arg),
        }
    }
}

impl<'a> ArrayValue<'a> {
    pub fn accept<V>(&self, visitor: &mut V) -> V::Output
    where
        V: ElementVisitor<'a> + ?Sized,
    {
        visitor.visit_array(self)
    }

    pub fn accept_with<V, A>(&self, visitor: &mut V, arg: A) -> V::Output
    where
        V: ElementVisitorWithArg<'a, A> + ?Sized,
    {
        visitor.visit_array(self, arg)
    }
}

impl<'a> ObjectValue<'a> {
    pub fn accept<V>(&self, visitor: &mut V) -> V::Output
    where
        V: ElementVisitor<'a> + ?Sized,
    {
        visitor.visit_object(self)
    }

    pub fn accept_with<V, A>(&self, visitor: &mut V, arg: A) -> V::Output
    where
        V: ElementVisitorWithArg<'a, A> + ?Sized,
    {
        visitor.visit_object(self, arg)
    }
}
