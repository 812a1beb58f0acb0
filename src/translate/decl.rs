use crate::error::Result;
use crate::graph::{self, DeclarationData, DefaultFieldValue};
use crate::ir::{
    ConstantId, EnumField, EnumId, Field, FieldDefault, InterfaceId, Method, Parameter, StructId, UnionId,
};

use super::{FileTranslator, attributes_from, ordinal_from};

impl<'g> FileTranslator<'g> {
    // Each populate_* writes the header first so anything reached while the
    // members resolve already sees the node's name and owner.

    pub(super) fn populate_struct(&mut self, id: StructId, raw: &'g graph::StructType) -> Result<()> {
        let header = self.header(&raw.decl_data)?;
        let node = &mut self.module.declarations.structs[id];
        node.name = header.name;
        node.spec = header.spec;
        node.owner = header.owner;
        node.attributes = header.attributes;

        let fields = raw
            .fields
            .iter()
            .map(|field| self.struct_field_from(field))
            .collect::<Result<Vec<_>>>()?;
        self.module.declarations.structs[id].fields = fields;

        let (enums, constants) = self.contained_from(&raw.decl_data)?;
        let node = &mut self.module.declarations.structs[id];
        node.enums = enums;
        node.constants = constants;
        Ok(())
    }

    pub(super) fn populate_union(&mut self, id: UnionId, raw: &'g graph::UnionType) -> Result<()> {
        let header = self.header(&raw.decl_data)?;
        let node = &mut self.module.declarations.unions[id];
        node.name = header.name;
        node.spec = header.spec;
        node.owner = header.owner;
        node.attributes = header.attributes;

        let fields = raw
            .fields
            .iter()
            .map(|field| -> Result<Field> {
                Ok(Field {
                    name: field.decl_data.short_name().to_owned(),
                    kind: self.kind_from(&field.ty)?,
                    ordinal: ordinal_from(&field.decl_data),
                    default: None,
                    attributes: attributes_from(field.decl_data.attributes.as_deref()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.module.declarations.unions[id].fields = fields;
        Ok(())
    }

    pub(super) fn populate_enum(&mut self, id: EnumId, raw: &'g graph::EnumType) -> Result<()> {
        let header = self.header(&raw.decl_data)?;
        let node = &mut self.module.declarations.enums[id];
        node.name = header.name;
        node.spec = header.spec;
        node.owner = header.owner;
        node.attributes = header.attributes;

        // Before the members: a member initializer may reference a sibling,
        // and that reference reads the parent off this node.
        let parent = self.parent_of(&raw.decl_data)?;
        self.module.declarations.enums[id].parent = parent;

        let fields = raw
            .values
            .iter()
            .map(|value| -> Result<EnumField> {
                let initializer = match &value.initializer_value {
                    Some(initializer) => Some(self.value_from(initializer)?),
                    None => None,
                };
                Ok(EnumField {
                    name: value.decl_data.short_name().to_owned(),
                    attributes: attributes_from(value.decl_data.attributes.as_deref()),
                    numeric_value: value.int_value,
                    value: initializer,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.module.declarations.enums[id].fields = fields;
        Ok(())
    }

    pub(super) fn populate_interface(&mut self, id: InterfaceId, raw: &'g graph::InterfaceType) -> Result<()> {
        let header = self.header(&raw.decl_data)?;
        let node = &mut self.module.declarations.interfaces[id];
        node.spec = header.name.clone();
        node.name = header.name;
        node.owner = header.owner;
        node.attributes = header.attributes;
        node.service_name = raw.service_name.clone();

        // BTreeMap keyed by ordinal: already in ordinal order.
        let methods = raw
            .methods
            .values()
            .map(|method| self.method_from(method))
            .collect::<Result<Vec<_>>>()?;
        self.module.declarations.interfaces[id].methods = methods;

        let (enums, constants) = self.contained_from(&raw.decl_data)?;
        let node = &mut self.module.declarations.interfaces[id];
        node.enums = enums;
        node.constants = constants;
        Ok(())
    }

    fn struct_field_from(&mut self, raw: &'g graph::StructField) -> Result<Field> {
        let default = match &raw.default_value {
            Some(DefaultFieldValue::Value(value)) => Some(FieldDefault::Value(self.value_from(value)?)),
            Some(DefaultFieldValue::DefaultKeyword) => Some(FieldDefault::Keyword),
            None => None,
        };
        Ok(Field {
            name: raw.decl_data.short_name().to_owned(),
            kind: self.kind_from(&raw.ty)?,
            ordinal: ordinal_from(&raw.decl_data),
            default,
            attributes: attributes_from(raw.decl_data.attributes.as_deref()),
        })
    }

    fn method_from(&mut self, raw: &'g graph::Method) -> Result<Method> {
        let parameters = self.parameters_from(&raw.parameters)?;
        let response_parameters = match &raw.response_params {
            Some(response) => Some(self.parameters_from(response)?),
            None => None,
        };
        Ok(Method {
            name: raw.decl_data.short_name().to_owned(),
            ordinal: raw.ordinal,
            attributes: attributes_from(raw.decl_data.attributes.as_deref()),
            parameters,
            response_parameters,
        })
    }

    /// Parameters arrive as the fields of a synthetic struct; flatten them.
    fn parameters_from(&mut self, params: &'g graph::StructType) -> Result<Vec<Parameter>> {
        params
            .fields
            .iter()
            .map(|field| -> Result<Parameter> {
                Ok(Parameter {
                    name: field.decl_data.short_name().to_owned(),
                    kind: self.kind_from(&field.ty)?,
                    ordinal: ordinal_from(&field.decl_data),
                    attributes: attributes_from(field.decl_data.attributes.as_deref()),
                })
            })
            .collect()
    }

    fn contained_from(&mut self, decl: &'g DeclarationData) -> Result<(Vec<EnumId>, Vec<ConstantId>)> {
        let Some(contained) = &decl.contained_declarations else {
            return Ok((Vec::new(), Vec::new()));
        };
        let enums = contained
            .enums
            .iter()
            .map(|key| self.enum_from_key(key))
            .collect::<Result<Vec<_>>>()?;
        let constants = contained
            .constants
            .iter()
            .map(|key| self.constant_from_key(key))
            .collect::<Result<Vec<_>>>()?;
        Ok((enums, constants))
    }
}
